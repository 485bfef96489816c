use anyhow::Result;
use client::{AnswerService, Language};
use form::QueryForm;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::render::render_state;

const HELP: &str = "\
Type a question and press enter.
  :lang <zh|en|de>  switch the answer language
  :lang             show the current language
  :help             show this help
  :quit, :q         leave
";

#[derive(Debug, PartialEq)]
enum Line<'a> {
    Question(&'a str),
    Lang(Option<&'a str>),
    Help,
    Quit,
}

fn parse_line(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((":lang", code)) => Line::Lang(Some(code.trim())),
        _ => match trimmed {
            ":lang" => Line::Lang(None),
            ":help" | ":h" => Line::Help,
            ":quit" | ":q" => Line::Quit,
            _ => Line::Question(line),
        },
    }
}

/// Read questions line by line until `:quit` or end of input.
pub async fn run<S, R, W>(form: &QueryForm<S>, input: R, out: &mut W) -> Result<()>
where
    S: AnswerService,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(
        out,
        "Meet-Kant. Answers in {}. :help for commands.",
        form.snapshot().language.label()
    )?;

    loop {
        write!(out, "? ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        match parse_line(&line) {
            Line::Quit => break,
            Line::Help => write!(out, "{}", HELP)?,
            Line::Lang(None) => {
                let lang = form.snapshot().language;
                writeln!(out, "Language: {} ({})", lang, lang.label())?;
            }
            Line::Lang(Some(code)) => match code.parse::<Language>() {
                Ok(lang) => {
                    form.set_language(lang);
                    writeln!(out, "Language: {} ({})", lang, lang.label())?;
                }
                Err(e) => writeln!(out, "{}", e)?,
            },
            Line::Question(question) => {
                form.set_question(question);
                submit_with_progress(form, out).await?;
                write!(out, "{}", render_state(&form.snapshot()))?;
            }
        }
    }

    Ok(())
}

/// Submit and print a loading line if the request does not finish at once.
async fn submit_with_progress<S, W>(form: &QueryForm<S>, out: &mut W) -> Result<()>
where
    S: AnswerService,
    W: Write,
{
    let mut updates = form.subscribe();
    let _ = updates.borrow_and_update();

    let submit = form.submit_query();
    tokio::pin!(submit);
    let mut shown = false;

    loop {
        tokio::select! {
            biased;
            _ = &mut submit => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    (&mut submit).await;
                    break;
                }
                if updates.borrow_and_update().loading && !shown {
                    writeln!(out, "Loading...")?;
                    out.flush()?;
                    shown = true;
                }
            }
        }
    }

    Ok(())
}
