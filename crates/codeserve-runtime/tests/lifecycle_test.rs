//! Launch sequence tests against a scripted engine.
//!
//! These tests verify:
//! 1. Step ordering (remove, pull, create, start)
//! 2. Failure handling per step, including the ignored removal failure
//! 3. Run-once behavior of the launcher, sequentially and concurrently
//! 4. The container specification handed to the engine

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

use codeserve_common::config::LauncherConfig;
use codeserve_common::constants::{CONTAINER_NAME, IMAGE};
use codeserve_common::types::{ContainerSpec, EnvironmentFacts, PortMapping};
use codeserve_engine::{Connector, Engine, EngineError, ProgressError, PullEvent, PullStream};
use codeserve_runtime::environment::EnvironmentProbe;
use codeserve_runtime::gate::GateState;
use codeserve_runtime::{LaunchError, Launcher, PullFailure, Supervisor};

// ── Scripted engine ─────────────────────────────────────────────────

#[derive(Default)]
struct Script {
    refuse_connect: bool,
    fail_remove: bool,
    pull_events: Vec<PullEvent>,
    malformed_tail: bool,
    fail_create: bool,
    fail_start: bool,
}

#[derive(Default)]
struct Recorder {
    connects: Mutex<usize>,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<ContainerSpec>>,
}

impl Recorder {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn connects(&self) -> usize {
        *self.connects.lock().unwrap()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[derive(Clone)]
struct ScriptedConnector {
    script: Arc<Script>,
    recorder: Arc<Recorder>,
}

struct ScriptedEngine {
    script: Arc<Script>,
    recorder: Arc<Recorder>,
}

fn rejected(what: &str) -> EngineError {
    EngineError::Rejected {
        message: format!("{what} refused by script"),
    }
}

impl Connector for ScriptedConnector {
    type Engine = ScriptedEngine;

    fn connect(&self) -> Result<ScriptedEngine, EngineError> {
        *self.recorder.connects.lock().unwrap() += 1;
        if self.script.refuse_connect {
            return Err(rejected("connect"));
        }
        Ok(ScriptedEngine {
            script: Arc::clone(&self.script),
            recorder: Arc::clone(&self.recorder),
        })
    }
}

impl Engine for ScriptedEngine {
    fn remove_container(&self, name: &str, force: bool) -> Result<(), EngineError> {
        self.recorder.record(format!("remove {name} force={force}"));
        if self.script.fail_remove {
            return Err(EngineError::Rejected {
                message: format!("No such container: {name}"),
            });
        }
        Ok(())
    }

    fn pull_image(&self, reference: &str) -> Result<PullStream, EngineError> {
        self.recorder.record(format!("pull {reference}"));
        let mut events: Vec<Result<PullEvent, EngineError>> =
            self.script.pull_events.iter().cloned().map(Ok).collect();
        if self.script.malformed_tail {
            events.push(Err(EngineError::MalformedEvent {
                detail: "expected `:` at line 1 column 9".into(),
            }));
        }
        Ok(Box::new(events.into_iter()))
    }

    fn create_container(&self, spec: &ContainerSpec) -> Result<String, EngineError> {
        self.recorder.record(format!("create {}", spec.name));
        self.recorder.created.lock().unwrap().push(spec.clone());
        if self.script.fail_create {
            return Err(rejected("create"));
        }
        Ok("f00dcafe".into())
    }

    fn start_container(&self, id: &str) -> Result<(), EngineError> {
        self.recorder.record(format!("start {id}"));
        if self.script.fail_start {
            return Err(rejected("start"));
        }
        Ok(())
    }
}

struct FixedProbe(Option<EnvironmentFacts>);

impl EnvironmentProbe for FixedProbe {
    fn resolve(&self) -> Result<EnvironmentFacts, LaunchError> {
        self.0.clone().ok_or_else(|| LaunchError::EnvironmentResolutionFailed {
            fact: "current directory",
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "deleted"),
        })
    }
}

fn facts() -> EnvironmentFacts {
    EnvironmentFacts {
        cwd: PathBuf::from("/work/talk"),
        uid: 1000,
        gid: 1000,
        username: "ada".into(),
        home: PathBuf::from("/home/ada"),
    }
}

fn happy_pull() -> Vec<PullEvent> {
    vec![
        PullEvent::layer("4.9.1", "Pulling from codercom/code-server"),
        PullEvent::layer("a1", "Downloading").with_progress(10, Some(20)),
        PullEvent::layer("a1", "Pull complete"),
        PullEvent::status("Status: Downloaded newer image"),
    ]
}

fn harness(
    script: Script,
) -> (
    Supervisor<ScriptedConnector, FixedProbe>,
    Arc<Recorder>,
) {
    let recorder = Arc::new(Recorder::default());
    let connector = ScriptedConnector {
        script: Arc::new(script),
        recorder: Arc::clone(&recorder),
    };
    let supervisor =
        Supervisor::with_probe(connector, FixedProbe(Some(facts())), LauncherConfig::default());
    (supervisor, recorder)
}

fn launcher(
    script: Script,
) -> (
    Launcher<ScriptedConnector, FixedProbe>,
    Arc<Recorder>,
) {
    let (supervisor, recorder) = harness(script);
    (
        Launcher::with_sink(supervisor, Box::new(Vec::<u8>::new())),
        recorder,
    )
}

// ── Supervisor ──────────────────────────────────────────────────────

#[test]
fn steps_run_in_order() {
    let (supervisor, recorder) = harness(Script {
        pull_events: happy_pull(),
        ..Script::default()
    });

    let mut sink: Vec<u8> = Vec::new();
    supervisor.ensure_running(&mut sink).expect("launch failed");

    assert_eq!(recorder.connects(), 1);
    assert_eq!(
        recorder.calls(),
        vec![
            format!("remove {CONTAINER_NAME} force=true"),
            format!("pull {IMAGE}"),
            format!("create {CONTAINER_NAME}"),
            "start f00dcafe".to_string(),
        ]
    );

    let output = String::from_utf8(sink).expect("utf8 output");
    assert!(output.contains("a1: Pull complete"));
    assert!(output.ends_with("Status: Downloaded newer image\n"));
}

#[test]
fn removal_failure_is_not_fatal() {
    let (supervisor, recorder) = harness(Script {
        fail_remove: true,
        pull_events: happy_pull(),
        ..Script::default()
    });

    supervisor
        .ensure_running(&mut Vec::new())
        .expect("removal failure must be ignored");

    assert_eq!(recorder.count("pull"), 1);
    assert_eq!(recorder.count("create"), 1);
    assert_eq!(recorder.count("start"), 1);
}

#[test]
fn embedded_pull_error_aborts_before_create() {
    let mut events = happy_pull();
    events.insert(2, PullEvent::failure("toomanyrequests: rate limit exceeded"));
    let (supervisor, recorder) = harness(Script {
        pull_events: events,
        ..Script::default()
    });

    let err = supervisor
        .ensure_running(&mut Vec::new())
        .expect_err("pull must fail");

    assert!(matches!(
        err,
        LaunchError::ImagePullFailed {
            source: PullFailure::Stream(ProgressError::LayerFailed { .. }),
            ..
        }
    ));
    assert!(err.to_string().contains("toomanyrequests"));
    assert_eq!(recorder.count("create"), 0);
    assert_eq!(recorder.count("start"), 0);
}

#[test]
fn malformed_pull_stream_aborts_before_create() {
    let (supervisor, recorder) = harness(Script {
        pull_events: happy_pull(),
        malformed_tail: true,
        ..Script::default()
    });

    let err = supervisor
        .ensure_running(&mut Vec::new())
        .expect_err("pull must fail");

    assert!(matches!(
        err,
        LaunchError::ImagePullFailed {
            source: PullFailure::Stream(ProgressError::MalformedStream { .. }),
            ..
        }
    ));
    assert_eq!(recorder.count("create"), 0);
}

#[test]
fn environment_failure_makes_no_engine_calls() {
    let recorder = Arc::new(Recorder::default());
    let connector = ScriptedConnector {
        script: Arc::new(Script::default()),
        recorder: Arc::clone(&recorder),
    };
    let supervisor = Supervisor::with_probe(connector, FixedProbe(None), LauncherConfig::default());

    let err = supervisor
        .ensure_running(&mut Vec::new())
        .expect_err("probe must fail");

    assert!(matches!(
        err,
        LaunchError::EnvironmentResolutionFailed {
            fact: "current directory",
            ..
        }
    ));
    assert_eq!(recorder.connects(), 0);
    assert!(recorder.calls().is_empty());
}

#[test]
fn unreachable_engine_is_engine_unavailable() {
    let (supervisor, recorder) = harness(Script {
        refuse_connect: true,
        ..Script::default()
    });

    let err = supervisor
        .ensure_running(&mut Vec::new())
        .expect_err("connect must fail");

    assert!(matches!(err, LaunchError::EngineUnavailable { .. }));
    assert!(recorder.calls().is_empty());
}

#[test]
fn create_failure_skips_start() {
    let (supervisor, recorder) = harness(Script {
        pull_events: happy_pull(),
        fail_create: true,
        ..Script::default()
    });

    let err = supervisor
        .ensure_running(&mut Vec::new())
        .expect_err("create must fail");

    assert!(matches!(err, LaunchError::ContainerCreateFailed { ref name, .. } if name == CONTAINER_NAME));
    assert_eq!(recorder.count("start"), 0);
}

#[test]
fn start_failure_names_container_id() {
    let (supervisor, _recorder) = harness(Script {
        pull_events: happy_pull(),
        fail_start: true,
        ..Script::default()
    });

    let err = supervisor
        .ensure_running(&mut Vec::new())
        .expect_err("start must fail");

    assert!(matches!(err, LaunchError::ContainerStartFailed { ref id, .. } if id == "f00dcafe"));
}

#[test]
fn created_spec_uses_fixed_name_image_and_port() {
    let config = LauncherConfig {
        host_port: 28080,
        ..LauncherConfig::default()
    };
    let recorder = Arc::new(Recorder::default());
    let connector = ScriptedConnector {
        script: Arc::new(Script::default()),
        recorder: Arc::clone(&recorder),
    };
    let supervisor = Supervisor::with_probe(connector, FixedProbe(Some(facts())), config);

    supervisor.ensure_running(&mut Vec::new()).expect("launch failed");

    let created = recorder.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    let spec = &created[0];
    assert_eq!(spec.name, CONTAINER_NAME);
    assert_eq!(spec.image, IMAGE);
    assert_eq!(spec.user, "1000:1000");
    assert_eq!(
        spec.port,
        PortMapping {
            container_port: 8080,
            host_port: 28080
        }
    );
    assert_eq!(spec.binds[0].host, PathBuf::from("/work/talk"));
    assert_eq!(spec.binds[1].host, PathBuf::from("/home/ada/.config"));
}

#[test]
fn remove_treats_refusal_as_error() {
    let (supervisor, recorder) = harness(Script {
        fail_remove: true,
        ..Script::default()
    });

    let err = supervisor.remove().expect_err("refusal must surface");
    assert!(matches!(err, LaunchError::ContainerRemoveFailed { .. }));
    assert_eq!(recorder.count("remove"), 1);
}

// ── Launcher gate ───────────────────────────────────────────────────

#[test]
fn repeated_starts_run_sequence_once() {
    let (launcher, recorder) = launcher(Script {
        pull_events: happy_pull(),
        ..Script::default()
    });
    assert_eq!(launcher.state(), GateState::NotStarted);

    for _ in 0..5 {
        launcher.start();
    }

    assert_eq!(launcher.state(), GateState::Done);
    assert_eq!(recorder.connects(), 1);
    assert_eq!(recorder.count("remove"), 1);
    assert_eq!(recorder.count("pull"), 1);
    assert_eq!(recorder.count("create"), 1);
    assert_eq!(recorder.count("start"), 1);
}

#[test]
fn failed_launch_is_not_retried() {
    let (launcher, recorder) = launcher(Script {
        pull_events: vec![PullEvent::failure("manifest unknown")],
        ..Script::default()
    });

    launcher.start();
    launcher.start();

    assert_eq!(launcher.state(), GateState::Done);
    assert_eq!(recorder.connects(), 1);
    assert_eq!(recorder.count("pull"), 1);
    assert_eq!(recorder.count("create"), 0);
}

#[test]
fn concurrent_starts_create_and_start_once() {
    let (launcher, recorder) = launcher(Script {
        pull_events: happy_pull(),
        ..Script::default()
    });
    let launcher = Arc::new(launcher);

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let launcher = Arc::clone(&launcher);
            thread::spawn(move || {
                launcher.start();
                // Every caller returns only after the single launch finished.
                assert_eq!(launcher.state(), GateState::Done);
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("caller thread panicked");
    }

    assert_eq!(recorder.connects(), 1);
    assert_eq!(recorder.count("create"), 1);
    assert_eq!(recorder.count("start"), 1);
}
