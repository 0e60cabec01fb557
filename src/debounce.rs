//! # Debounce & Preview Loop
//!
//! Every form-field mutation is a potential render trigger. [`debounce`]
//! coalesces a burst of edits into a single trailing emission once input
//! settles for a quiet window, the backpressure mechanism that keeps a
//! render from firing on every keystroke.
//!
//! [`run_preview_loop`] wires the form boundary to the orchestrator:
//! debounced payloads are normalized and rendered, and every attempt
//! resolves to a [`PreviewEvent`] on the outcome channel. Nothing is
//! silently swallowed.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::{LuceroError, ValidationError};
use crate::form::QrForm;
use crate::logo::LogoImage;
use crate::preview::{Preview, RenderOutcome};

/// Default quiet window between the last edit and the render it triggers.
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(300);

/// Forward only the latest value after `quiet` of input silence.
///
/// N rapid sends within the window produce exactly one emission carrying
/// the final value. Closing the input channel flushes any pending value
/// and then closes the output.
pub fn debounce<T: Send + 'static>(
    quiet: Duration,
    mut input: mpsc::UnboundedReceiver<T>,
) -> mpsc::UnboundedReceiver<T> {
    let (tx, output) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut pending: Option<T> = None;
        loop {
            match pending.take() {
                None => match input.recv().await {
                    Some(value) => pending = Some(value),
                    None => break,
                },
                Some(value) => {
                    tokio::select! {
                        next = input.recv() => match next {
                            // A newer value supersedes the pending one and
                            // restarts the quiet window.
                            Some(next) => pending = Some(next),
                            None => {
                                let _ = tx.send(value);
                                break;
                            }
                        },
                        _ = tokio::time::sleep(quiet) => {
                            if tx.send(value).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        }
    });

    output
}

/// One form payload from the form boundary: raw field values plus the
/// uploaded logo bytes, if any.
pub type FormPayload = (QrForm, Option<LogoImage>);

/// How one debounced form payload resolved.
#[derive(Debug)]
pub enum PreviewEvent {
    /// Render applied (or resolved blank/superseded) without error.
    Rendered(RenderOutcome),
    /// The payload failed validation; per-field errors for the UI.
    Invalid(ValidationError),
    /// Encoding or logo decode failed; surfaced as a dismissible banner.
    Failed(LuceroError),
}

/// Drive the live preview: debounce form payloads, normalize, render,
/// report. Runs until the form channel closes.
pub async fn run_preview_loop(
    preview: Arc<Preview>,
    forms: mpsc::UnboundedReceiver<FormPayload>,
    events: mpsc::UnboundedSender<PreviewEvent>,
    quiet: Duration,
) {
    let mut settled = debounce(quiet, forms);

    while let Some((form, logo)) = settled.recv().await {
        let event = match form.normalize(logo) {
            Err(invalid) => PreviewEvent::Invalid(invalid),
            Ok(request) => match preview.request_render(&request).await {
                Ok(outcome) => PreviewEvent::Rendered(outcome),
                Err(e) => PreviewEvent::Failed(e),
            },
        };
        if events.send(event).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::OutputFormat;

    fn form(input: &str) -> QrForm {
        QrForm {
            input: input.to_string(),
            error_correction: Some("M".to_string()),
            scale: Some("4".to_string()),
            margin: Some("0".to_string()),
            light_color: Some("#FFFFFF".to_string()),
            dark_color: Some("#000000".to_string()),
            ..Default::default()
        }
    }

    // With the clock paused, `sleep` runs in virtual time: the runtime
    // auto-advances to the next timer deadline once every task is parked,
    // so intermediate quiet windows fire in order.

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_single_trailing_value() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut settled = debounce(Duration::from_millis(300), rx);

        // Rapid keystrokes, each well inside the quiet window.
        for value in 1..=5 {
            tx.send(value).unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(settled.recv().await, Some(5));

        // Nothing else pending.
        assert!(settled.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_edits_each_emit() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut settled = debounce(Duration::from_millis(300), rx);

        tx.send("first").unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        tx.send("second").unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(settled.recv().await, Some("first"));
        assert_eq!(settled.recv().await, Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_flushes_pending_value() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut settled = debounce(Duration::from_millis(300), rx);

        tx.send(42).unwrap();
        drop(tx);

        assert_eq!(settled.recv().await, Some(42));
        assert_eq!(settled.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_renders_final_form_values() {
        let preview = Arc::new(Preview::new());
        let (form_tx, form_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();

        let driver = tokio::spawn(run_preview_loop(
            preview.clone(),
            form_rx,
            event_tx,
            Duration::from_millis(300),
        ));

        // A typing burst; only the final content may render.
        for content in ["h", "he", "hel", "hello"] {
            form_tx.send((form(content), None)).unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        let event = event_rx.recv().await.unwrap();
        assert!(matches!(
            event,
            PreviewEvent::Rendered(RenderOutcome::Completed)
        ));
        assert!(event_rx.try_recv().is_err());
        assert!(preview.export(OutputFormat::Png).is_ok());

        drop(form_tx);
        driver.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_surfaces_field_errors() {
        let preview = Arc::new(Preview::new());
        let (form_tx, form_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_preview_loop(
            preview,
            form_rx,
            event_tx,
            Duration::from_millis(300),
        ));

        let mut bad = form("hello");
        bad.scale = Some("0".to_string());
        form_tx.send((bad, None)).unwrap();

        match event_rx.recv().await.unwrap() {
            PreviewEvent::Invalid(err) => assert!(!err.field("scale").is_empty()),
            other => panic!("expected validation event, got {:?}", other),
        }
    }
}
