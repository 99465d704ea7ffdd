//! [`PromptInputPort`] over any line-oriented async reader.

use async_trait::async_trait;
use recipes_application::{InputError, PromptInputPort};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Reads prompts from the terminal
pub type StdinPromptInput = LineInput<BufReader<Stdin>>;

impl StdinPromptInput {
    pub fn stdin() -> Self {
        LineInput::new(BufReader::new(tokio::io::stdin()))
    }
}

/// Shows the prompt on stdout and reads one line from `R`.
pub struct LineInput<R> {
    lines: Mutex<Lines<R>>,
}

impl<R: AsyncBufRead + Unpin> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
        }
    }
}

#[async_trait]
impl<R> PromptInputPort for LineInput<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn read_line(&self, prompt: &str) -> Result<Option<String>, InputError> {
        {
            let mut stdout = std::io::stdout().lock();
            write!(stdout, "{}", prompt)
                .and_then(|_| stdout.flush())
                .map_err(|e| InputError::Io(e.to_string()))?;
        }

        self.lines
            .lock()
            .await
            .next_line()
            .await
            .map_err(|e| InputError::Io(e.to_string()))
    }
}
