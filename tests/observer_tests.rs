// Observer notification tests

use barebones::interpreter::{Interpreter, Observer, Output, OutputKind, RunState, StepEvent};
use barebones::parser;
use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Step(usize, usize),
    Output(OutputKind),
    Finished,
}

struct Recorder {
    tag: &'static str,
    log: Rc<RefCell<Vec<(&'static str, Event)>>>,
}

impl Observer for Recorder {
    fn on_step_finished(&mut self, event: &StepEvent) {
        self.log
            .borrow_mut()
            .push((self.tag, Event::Step(event.position, event.next)));
    }

    fn on_run_finished(&mut self) {
        self.log.borrow_mut().push((self.tag, Event::Finished));
    }

    fn on_output(&mut self, output: &Output) {
        self.log
            .borrow_mut()
            .push((self.tag, Event::Output(output.kind)));
    }
}

fn recorded(source: &str) -> (Interpreter, Rc<RefCell<Vec<(&'static str, Event)>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let interp = Interpreter::new(parser::load(source).expect("Loading failed")).with_observer(
        Box::new(Recorder {
            tag: "a",
            log: Rc::clone(&log),
        }),
    );
    (interp, log)
}

fn events(log: &Rc<RefCell<Vec<(&'static str, Event)>>>) -> Vec<Event> {
    log.borrow().iter().map(|(_, e)| e.clone()).collect()
}

#[test]
fn test_run_emits_only_completion() {
    let (mut interp, log) = recorded("clear X; incr X; while X not 0; decr X; end while");
    interp.run().unwrap();

    assert_eq!(events(&log), vec![Event::Finished]);
}

#[test]
fn test_step_events_report_jumps() {
    let (mut interp, log) = recorded("clear X; while X == 0; incr X; end while");
    while !interp.is_done() {
        interp.step().unwrap();
    }

    assert_eq!(
        events(&log),
        vec![
            Event::Step(0, 1),
            Event::Step(1, 2),
            Event::Step(2, 3),
            Event::Step(3, 1),
            Event::Step(1, 4),
            Event::Finished,
        ]
    );
}

#[test]
fn test_completion_fires_once() {
    let (mut interp, log) = recorded("incr X");
    interp.step().unwrap();
    interp.step().unwrap();
    interp.step().unwrap();
    interp.run().unwrap();
    interp.stop();

    let finished = events(&log)
        .into_iter()
        .filter(|e| *e == Event::Finished)
        .count();
    assert_eq!(finished, 1);
}

#[test]
fn test_observers_called_in_registration_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut interp = Interpreter::new(parser::load("incr X").expect("Loading failed"));
    for tag in ["first", "second"] {
        interp.add_observer(Box::new(Recorder {
            tag,
            log: Rc::clone(&log),
        }));
    }
    interp.step().unwrap();

    let tags: Vec<&str> = log.borrow().iter().map(|(t, _)| *t).collect();
    assert_eq!(tags, vec!["first", "second"]);
}

#[test]
fn test_runtime_error_tagged_then_completion() {
    let (mut interp, log) = recorded("clear X; if X ~ 0; incr X; end if");
    assert!(interp.run().is_err());

    assert_eq!(
        events(&log),
        vec![Event::Output(OutputKind::Error), Event::Finished]
    );
}

#[test]
fn test_unknown_command_warns_and_continues() {
    let (mut interp, log) = recorded("bogus X; incr X");
    interp.run().unwrap();

    assert_eq!(
        events(&log),
        vec![Event::Output(OutputKind::Warning), Event::Finished]
    );
    assert_eq!(interp.variables().get("X"), Some(1));
}

#[test]
fn test_stop_handle_ends_step_mode() {
    let (mut interp, log) = recorded("incr X; incr X; incr X");
    let handle = interp.stop_handle();

    interp.step().unwrap();
    handle.stop();
    interp.step().unwrap();
    interp.step().unwrap();

    assert_eq!(interp.variables().get("X"), Some(1));
    assert_eq!(events(&log), vec![Event::Step(0, 1), Event::Finished]);
    assert!(!handle.is_stop_requested());
}

#[test]
fn test_stop_handle_interrupts_run_from_another_thread() {
    let (mut interp, log) = recorded("clear X; while X == 0; end while");
    let handle = interp.stop_handle();

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        handle.stop();
    });
    interp.run().unwrap();
    stopper.join().unwrap();

    assert_eq!(interp.state(), RunState::Stopped);
    assert!(interp.executed() > 0);
    assert!(interp.elapsed().is_none());
    assert_eq!(events(&log), vec![Event::Finished]);
}

#[test]
fn test_load_errors_reach_observers() {
    let err = parser::load("while X == 0").unwrap_err();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut recorder = Recorder {
        tag: "load",
        log: Rc::clone(&log),
    };
    for output in err.outputs() {
        recorder.on_output(&output);
    }

    assert_eq!(
        events(&log),
        vec![
            Event::Output(OutputKind::Error),
            Event::Output(OutputKind::Error)
        ]
    );
}
