use std::io::{self, BufRead, Write};

use rand::rngs::SmallRng;
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::{
    board::{Board, BoardStyle},
    common::Sign,
    config::{BOARD_DIM, RANDOM_MOVE_PROBABILITY},
    rules::{apply_index, parse_move},
};

use super::{best_move, Strategy};

/// A person at the server's terminal plays the automated side.
///
/// The board is printed with numbered hints and the heuristic's pick is
/// offered as a suggestion; pressing ENTER accepts it. On a multi-thread
/// tokio runtime the blocking read is wrapped in `block_in_place`; on a
/// current-thread runtime it stalls the runtime until a line arrives.
pub struct ManualStrategy<R, W> {
    input: R,
    output: W,
    sign: Sign,
}

impl ManualStrategy<io::BufReader<io::Stdin>, io::Stdout> {
    /// Read moves from the process's standard input.
    pub fn stdin() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> ManualStrategy<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            sign: Sign::LOCAL,
        }
    }

    fn print_board(&mut self, board: &Board) -> io::Result<()> {
        writeln!(self.output)?;
        for row in 0..BOARD_DIM {
            writeln!(self.output, "{}", board.render_row(row, BoardStyle::Numbered))?;
        }
        writeln!(self.output)
    }
}

impl<R: BufRead + Send, W: Write + Send> Strategy for ManualStrategy<R, W> {
    fn choose_move(&mut self, rng: &mut SmallRng, board: &Board) -> anyhow::Result<u8> {
        self.print_board(board)?;
        let suggestion = best_move(board, self.sign, RANDOM_MOVE_PROBABILITY, rng);
        loop {
            match suggestion {
                Some(s) => write!(self.output, "Your move (1-9) [suggested: {}]: ", s)?,
                None => write!(self.output, "Your move (1-9): ")?,
            }
            self.output.flush()?;

            let mut line = String::new();
            if read_line_blocking(&mut self.input, &mut line)? == 0 {
                return Err(anyhow::anyhow!("local input closed"));
            }
            let line = line.trim();

            let choice = if line.is_empty() {
                suggestion
            } else {
                parse_move(line)
            };
            if let Some(index) = choice {
                let mut trial = *board;
                if apply_index(&mut trial, index, self.sign) {
                    return Ok(index);
                }
            }
            writeln!(self.output, "Invalid move. Try again.")?;
        }
    }

    fn name(&self) -> &'static str {
        "manual"
    }
}

/// Blocking line read that hands the worker's other tasks off first when
/// called from inside a multi-thread runtime.
fn read_line_blocking<R: BufRead>(input: &mut R, line: &mut String) -> io::Result<usize> {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(|| input.read_line(line))
        }
        _ => input.read_line(line),
    }
}
