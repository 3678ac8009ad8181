//! Line-oriented console: the presenter the store talks to, and the I/O the
//! shell reads commands from.

use std::cell::{Cell, RefCell};
use std::io::{self, BufRead, Write};

use equiptrack_inventory::{DraftField, Presenter};

/// Console presenter over any line reader and writer.
///
/// Focus requests are held until the shell finishes its next render and
/// calls [`take_focus`](Self::take_focus).
#[derive(Debug)]
pub struct ConsolePresenter<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
    assume_yes: bool,
    pending_focus: Cell<Option<DraftField>>,
}

impl<R, W> ConsolePresenter<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W, assume_yes: bool) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
            assume_yes,
            pending_focus: Cell::new(None),
        }
    }

    /// Write `prompt` and read one line. `None` on end of input.
    pub fn prompt_line(&self, prompt: &str) -> io::Result<Option<String>> {
        {
            let mut out = self.output.borrow_mut();
            write!(out, "{prompt}")?;
            out.flush()?;
        }

        let mut line = String::new();
        if self.input.borrow_mut().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn say(&self, text: &str) -> io::Result<()> {
        writeln!(self.output.borrow_mut(), "{text}")
    }

    /// The focus request left by the last command, if any. Cleared on read.
    pub fn take_focus(&self) -> Option<DraftField> {
        self.pending_focus.take()
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

impl<R, W> Presenter for ConsolePresenter<R, W>
where
    R: BufRead,
    W: Write,
{
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            if let Err(err) = self.say(&format!("{prompt} [auto-confirmed]")) {
                tracing::warn!(error = %err, "failed to echo auto-confirmed prompt");
            }
            return true;
        }

        match self.prompt_line(&format!("{prompt} [y/N] ")) {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(error = %err, "confirmation prompt failed; treating as declined");
                false
            }
        }
    }

    fn focus_after_render(&self, field: DraftField) {
        self.pending_focus.set(Some(field));
    }
}
