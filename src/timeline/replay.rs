use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::model::{Operation, Timeline};
use crate::debounce::{DebounceOptions, debounce};
use crate::error::DebounceError;
use crate::scheduler::ManualScheduler;

/// Which edge produced an execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Leading,
    Trailing,
    Flush,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trigger::Leading => "leading",
            Trigger::Trailing => "trailing",
            Trigger::Flush => "flush",
        };
        f.pad(name)
    }
}

/// One run of the wrapped action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Execution {
    pub at: u64,
    pub arg: Value,
    pub trigger: Trigger,
}

/// What an operation returned to its caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationOutcome {
    pub at: u64,
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<Value>,
    /// Last stored result; `None` for cancel or before any execution
    pub returned: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportOptions {
    pub wait_ms: u64,
    pub leading: bool,
    pub trailing: bool,
    pub max_wait_ms: Option<u64>,
}

impl From<DebounceOptions> for ReportOptions {
    fn from(options: DebounceOptions) -> Self {
        Self {
            wait_ms: millis(options.wait),
            leading: options.leading,
            trailing: options.trailing,
            max_wait_ms: options.max_wait.map(millis),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub options: ReportOptions,
    pub executions: Vec<Execution>,
    pub operations: Vec<OperationOutcome>,
    /// Simulated time when the last timer had fired
    pub finished_at: u64,
}

impl Report {
    pub fn to_json(&self) -> Result<String, DebounceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = &self.options;
        write!(
            f,
            "options: wait={}ms leading={} trailing={}",
            options.wait_ms, options.leading, options.trailing
        )?;
        match options.max_wait_ms {
            Some(max_wait) => writeln!(f, " max_wait={}ms", max_wait)?,
            None => writeln!(f)?,
        }

        writeln!(f, "operations:")?;
        for outcome in &self.operations {
            write!(f, "  {:>8}ms  {:<6}", outcome.at, outcome.op)?;
            if let Some(arg) = &outcome.arg {
                write!(f, " {}", arg)?;
            }
            match &outcome.returned {
                Some(value) => writeln!(f, " -> {}", value)?,
                None => writeln!(f, " -> (none)")?,
            }
        }

        writeln!(f, "executions: {}", self.executions.len())?;
        for execution in &self.executions {
            writeln!(
                f,
                "  {:>8}ms  {:<8}  {}",
                execution.at, execution.trigger, execution.arg
            )?;
        }
        write!(f, "finished at {}ms", self.finished_at)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Replay `timeline` against an identity action debounced with `options`.
///
/// Timers due at an entry's time fire before the entry runs. After the last
/// entry the scheduler runs until idle so the final trailing edge shows up.
pub fn replay(timeline: &Timeline, options: DebounceOptions) -> Report {
    let scheduler = ManualScheduler::new();
    let executions = Rc::new(RefCell::new(Vec::new()));
    let trigger = Rc::new(Cell::new(Trigger::Trailing));

    let debounced = {
        let executions = Rc::clone(&executions);
        let trigger = Rc::clone(&trigger);
        let clock = scheduler.clone();
        debounce(
            move |arg: Value| {
                executions.borrow_mut().push(Execution {
                    at: millis(clock.now()),
                    arg: arg.clone(),
                    trigger: trigger.get(),
                });
                arg
            },
            options,
            scheduler.clone(),
            scheduler.clone(),
        )
    };

    let mut operations = Vec::with_capacity(timeline.entries().len());
    for entry in timeline.entries() {
        scheduler.advance_to(Duration::from_millis(entry.at));
        log::debug!("replay: {} at {}ms", entry.op.name(), entry.at);

        let (arg, returned) = match &entry.op {
            Operation::Call { arg } => {
                trigger.set(Trigger::Leading);
                (Some(arg.clone()), debounced.call(arg.clone()))
            }
            Operation::Flush => {
                trigger.set(Trigger::Flush);
                (None, debounced.flush())
            }
            Operation::Cancel => {
                debounced.cancel();
                (None, None)
            }
        };
        trigger.set(Trigger::Trailing);

        operations.push(OperationOutcome {
            at: entry.at,
            op: entry.op.name(),
            arg,
            returned,
        });
    }

    scheduler.run_until_idle();
    let finished_at = millis(scheduler.now());
    drop(debounced);

    let executions = executions.take();
    Report {
        options: options.into(),
        executions,
        operations,
        finished_at,
    }
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod replay_tests;
