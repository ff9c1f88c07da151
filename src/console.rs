//! Operator input/output used by the interactive tools.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::thread;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::errors::InputError;

/// Line-oriented conversation with the operator
pub trait Console {
    /// Show `prompt` and wait for one line of input, without the line terminator
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError>;

    fn write_line(&mut self, line: &str);
}

enum TerminalEvent {
    Line(String),
    Failed(io::Error),
    Closed,
    Interrupt,
}

/// Console on stdin/stdout that turns Ctrl-C or end of input into `InputError::Cancelled`.
///
/// Reads block the calling thread, so it must be used from a blocking context
/// (e.g. inside `tokio::task::spawn_blocking`). Input and interrupt listening
/// start on the first read; an interrupt pressed between reads cancels the next one.
pub struct TerminalConsole {
    handle: Handle,
    events: Option<UnboundedReceiver<TerminalEvent>>,
    input_closed: bool,
}

impl TerminalConsole {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            events: None,
            input_closed: false,
        }
    }
}

fn start_listening(handle: &Handle) -> UnboundedReceiver<TerminalEvent> {
    let (sender, receiver) = mpsc::unbounded_channel();

    let interrupts = sender.clone();
    handle.spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if interrupts.send(TerminalEvent::Interrupt).is_err() {
                break;
            }
        }
    });

    // Plain thread: a read still pending at exit must not hold up runtime shutdown
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let event = match line {
                Ok(line) => TerminalEvent::Line(line),
                Err(e) => {
                    let _ = sender.send(TerminalEvent::Failed(e));
                    break;
                }
            };
            if sender.send(event).is_err() {
                return;
            }
        }
        let _ = sender.send(TerminalEvent::Closed);
    });

    receiver
}

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        let handle = &self.handle;
        let events = self.events.get_or_insert_with(|| start_listening(handle));

        print!("{}", prompt);
        io::stdout().flush()?;

        let result = if self.input_closed {
            Err(InputError::Cancelled)
        } else {
            match events.blocking_recv() {
                Some(TerminalEvent::Line(line)) => Ok(line),
                Some(TerminalEvent::Failed(e)) => Err(InputError::Io(e)),
                Some(TerminalEvent::Interrupt) => Err(InputError::Cancelled),
                Some(TerminalEvent::Closed) | None => {
                    self.input_closed = true;
                    Err(InputError::Cancelled)
                }
            }
        };

        if matches!(result, Err(InputError::Cancelled)) {
            println!();
        }
        result
    }

    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

#[derive(Debug)]
pub enum ScriptedInput {
    Line(String),
    Interrupt,
    Failure(io::ErrorKind),
}

/// Console fed from a fixed script, recording everything shown to the operator.
/// Running out of script behaves like a closed input stream.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<ScriptedInput>,
    output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: lines
                .into_iter()
                .map(|line| ScriptedInput::Line(line.into()))
                .collect(),
            output: Vec::new(),
        }
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.inputs.push_back(ScriptedInput::Line(line.into()));
        self
    }

    pub fn push_interrupt(&mut self) -> &mut Self {
        self.inputs.push_back(ScriptedInput::Interrupt);
        self
    }

    pub fn push_failure(&mut self, kind: io::ErrorKind) -> &mut Self {
        self.inputs.push_back(ScriptedInput::Failure(kind));
        self
    }

    /// Prompts and lines written so far
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        self.output.push(prompt.to_string());
        match self.inputs.pop_front() {
            Some(ScriptedInput::Line(line)) => Ok(line),
            Some(ScriptedInput::Interrupt) | None => Err(InputError::Cancelled),
            Some(ScriptedInput::Failure(kind)) => {
                Err(InputError::Io(io::Error::new(kind, "scripted input failure")))
            }
        }
    }

    fn write_line(&mut self, line: &str) {
        self.output.push(line.to_string());
    }
}
