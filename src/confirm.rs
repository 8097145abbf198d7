// Operator confirmation before anything destructive happens

use crate::models::RunConfig;
use crate::style::{Tone, paint};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

/// Where the operator's answer comes from.
pub trait PromptInput: Send {
    /// Next line of input, or `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// The controlling terminal. Read directly so the prompt still works when
/// stdin is a pipe (e.g. `curl ... | sh`). Opened on first read, so runs
/// that never prompt never need a terminal.
#[derive(Default)]
pub struct TtyInput {
    reader: Option<BufReader<File>>,
}

impl TtyInput {
    pub const DEVICE: &'static str = "/dev/tty";

    pub fn new() -> Self {
        Self::default()
    }
}

impl PromptInput for TtyInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let reader = match self.reader.take() {
            Some(r) => r,
            None => BufReader::new(File::open(Self::DEVICE).map_err(|e| {
                io::Error::new(e.kind(), format!("cannot open {}: {e}", Self::DEVICE))
            })?),
        };
        let reader = self.reader.insert(reader);
        let mut line = String::new();
        match reader.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }
}

/// Canned answers for tests. Counts reads so tests can assert none happened.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    reads: usize,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            reads: 0,
        }
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl PromptInput for ScriptedInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.reads += 1;
        Ok(self.lines.pop_front())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Cancelled,
}

/// Asks once. Only "y" (any case, surrounding whitespace ignored) proceeds;
/// everything else, including an empty line or EOF, cancels without re-asking.
pub struct ConfirmationGate<I, W> {
    input: I,
    out: W,
    styled: bool,
}

impl<I: PromptInput, W: Write> ConfirmationGate<I, W> {
    pub fn new(input: I, out: W, styled: bool) -> Self {
        Self { input, out, styled }
    }

    pub fn confirm(&mut self, cfg: RunConfig) -> io::Result<Decision> {
        if cfg.skip_confirmation {
            return Ok(Decision::Proceed);
        }

        self.write_warning(cfg)?;
        let answer = self.input.read_line()?;
        // Keep the terminal tidy when the operator hits ^D.
        if answer.is_none() {
            writeln!(self.out)?;
        }
        Ok(interpret(answer.as_deref()))
    }

    pub fn into_parts(self) -> (I, W) {
        (self.input, self.out)
    }

    fn write_warning(&mut self, cfg: RunConfig) -> io::Result<()> {
        let s = self.styled;
        writeln!(self.out, "{}", paint("WARNING! This will remove:", Tone::Warning, s))?;
        for line in [
            "all stopped containers",
            "all networks not used by at least one container",
            "all images without at least one container associated to them",
            "all build cache",
            "all volumes not used by at least one container",
        ] {
            writeln!(self.out, "  - {line}")?;
        }
        if cfg.force_stop_running {
            writeln!(
                self.out,
                "{}",
                paint(
                    "--force is set: ALL RUNNING CONTAINERS WILL BE STOPPED first!",
                    Tone::Danger,
                    s
                )
            )?;
        }
        write!(self.out, "Are you sure you want to continue? [y/N] ")?;
        self.out.flush()
    }
}

fn interpret(answer: Option<&str>) -> Decision {
    match answer.map(|a| a.trim().to_lowercase()) {
        Some(a) if a == "y" => Decision::Proceed,
        _ => Decision::Cancelled,
    }
}
