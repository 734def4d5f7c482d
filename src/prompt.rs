//! Terminal reviewer for interactive recategorization.
//!
//! `ConsoleResolver` is the `Resolver` the `catdb-recategorize` binary plugs
//! in. It is generic over its input and output so tests can drive it with
//! scripted answers. Bad input re-prompts the same command; it never advances.

use crate::categorizer::{Resolution, Resolver, ReviewRequest};
use crate::catalog::CategoryCatalogue;
use crate::report::Palette;
use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};

pub struct ConsoleResolver<R, W> {
    input: R,
    output: W,
    palette: Palette,
}

impl<R: BufRead, W: Write> ConsoleResolver<R, W> {
    pub fn new(input: R, output: W, palette: Palette) -> Self {
        Self {
            input,
            output,
            palette,
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("reading reviewer input")?;
        if read == 0 {
            bail!("input closed while waiting for a review answer");
        }
        Ok(line.trim().to_string())
    }

    fn list_categories(&mut self, catalogue: &CategoryCatalogue) -> Result<()> {
        writeln!(self.output, "\nAvailable categories:")?;
        for id in catalogue.all_category_ids() {
            writeln!(self.output, "• {id}")?;
        }
        Ok(())
    }

    fn choose_candidate(&mut self, candidates: &[String]) -> Result<Option<String>> {
        writeln!(self.output, "\nAvailable suggestions:")?;
        for (idx, cat) in candidates.iter().enumerate() {
            writeln!(self.output, "{}. {cat}", idx + 1)?;
        }
        let answer = self.ask("\nChoose category number (or 'b' to go back): ")?;
        if answer.eq_ignore_ascii_case("b") {
            return Ok(None);
        }
        match answer.parse::<usize>() {
            Ok(n) if (1..=candidates.len()).contains(&n) => Ok(Some(candidates[n - 1].clone())),
            Ok(_) => {
                writeln!(self.output, "{}", self.palette.error("Invalid selection number"))?;
                Ok(None)
            }
            Err(_) => {
                writeln!(
                    self.output,
                    "{}",
                    self.palette
                        .error("Please enter a valid number or 'b' to go back")
                )?;
                Ok(None)
            }
        }
    }

    fn enter_category(&mut self, catalogue: &CategoryCatalogue) -> Result<Option<String>> {
        loop {
            self.list_categories(catalogue)?;
            let answer = self.ask("\nEnter category (or 'b' to go back): ")?;
            if answer.eq_ignore_ascii_case("b") {
                return Ok(None);
            }
            if catalogue.contains(&answer) {
                return Ok(Some(answer));
            }
            writeln!(self.output, "{}", self.palette.error("Invalid category"))?;
        }
    }
}

impl<R: BufRead, W: Write> Resolver for ConsoleResolver<R, W> {
    fn resolve(
        &mut self,
        request: &ReviewRequest<'_>,
        catalogue: &CategoryCatalogue,
    ) -> Result<Resolution> {
        let suggested = if request.candidates.is_empty() {
            "None".to_string()
        } else {
            request.candidates.join(", ")
        };
        writeln!(self.output)?;
        writeln!(self.output, "{} {}", self.palette.bold("Command:"), request.key)?;
        writeln!(
            self.output,
            "{} {}",
            self.palette.bold("Description:"),
            request.description
        )?;
        writeln!(
            self.output,
            "{} {}",
            self.palette.bold("Current category:"),
            request.current
        )?;
        writeln!(
            self.output,
            "{} {suggested}",
            self.palette.bold("Suggested categories:")
        )?;

        loop {
            writeln!(self.output, "\nOptions:")?;
            writeln!(self.output, "1. Keep current category")?;
            writeln!(self.output, "2. Choose from suggestions")?;
            writeln!(self.output, "3. Enter different category")?;
            writeln!(self.output, "4. Show all available categories")?;
            writeln!(self.output, "5. Skip this command")?;

            match self.ask("\nEnter choice (1-5): ")?.as_str() {
                "1" => return Ok(Resolution::Keep),
                "2" => {
                    if request.candidates.is_empty() {
                        writeln!(
                            self.output,
                            "{}",
                            self.palette.warning("No suggestions available")
                        )?;
                        continue;
                    }
                    if let Some(id) = self.choose_candidate(&request.candidates)? {
                        return Ok(Resolution::Assign(id));
                    }
                }
                "3" => {
                    if let Some(id) = self.enter_category(catalogue)? {
                        return Ok(Resolution::Assign(id));
                    }
                }
                "4" => {
                    self.list_categories(catalogue)?;
                    self.ask("\nPress Enter to continue...")?;
                }
                "5" => return Ok(Resolution::Skip),
                _ => writeln!(self.output, "{}", self.palette.error("Invalid choice"))?,
            }
        }
    }
}
