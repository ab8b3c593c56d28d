use std::fmt::Write;
use upgrade_wizard::{SessionOutput, SessionView, StatusMessage};

fn status_line(out: &mut String, message: &StatusMessage) {
    let _ = writeln!(out, "[{}] {}", message.status, message.title);
    if !message.message.is_empty() {
        let _ = writeln!(out, "    {}", message.message);
    }
    if let Some(statements) = &message.diagnostics {
        for statement in statements {
            let _ = writeln!(out, "    > {}", statement);
        }
    }
}

/// Plain text rendering of an invocation's output.
pub fn render(output: &SessionOutput) -> String {
    let mut out = String::new();

    for message in &output.notices {
        status_line(&mut out, message);
    }

    match &output.view {
        SessionView::Pending(report) => {
            let _ = writeln!(
                out,
                "{} of {} wizard(s) done ({}%)",
                report.total - report.pending.len(),
                report.total,
                report.percent_complete
            );
            for wizard in &report.pending {
                let marker = if wizard.render_next_button { "*" } else { "-" };
                let _ = writeln!(out, " {} {} ({})", marker, wizard.title, wizard.identifier);
                for line in wizard.explanation.lines() {
                    let _ = writeln!(out, "     {}", line);
                }
            }
            if report.needs_initial_schema {
                let _ = writeln!(
                    out,
                    "The database schema must be updated before the remaining wizards are shown."
                );
            }
        }
        SessionView::NoWizards => {}
        SessionView::Prompt(prompt) => {
            let _ = writeln!(out, "{} ({})", prompt.title, prompt.identifier);
            if !prompt.form.is_empty() {
                let _ = writeln!(out, "{}", prompt.form);
            }
        }
        SessionView::Update(report) => {
            let _ = writeln!(out, "{} ({}): {}", report.title, report.identifier, report.state);
            match &report.next_identifier {
                Some(next) => {
                    let _ = writeln!(out, "Next wizard: {}", next);
                }
                None => {
                    let _ = writeln!(out, "No more wizards to run.");
                }
            }
        }
    }

    if let Some(result) = &output.result {
        status_line(&mut out, result);
    }
    out
}
