//! The poll-detect-notify loop.
//!
//! One sequential actor: fetch, validate, render, dedup against the last
//! delivered text, notify, sleep. Every failure of the chain is turned into a
//! failure report that goes through the same dedup gate, so a sustained
//! outage produces one chat message rather than one per cycle.

use std::{sync::Arc, time::Duration};

use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    domain::{ChatId, MessageRef, Watermark},
    errors::Error,
    formatting::{
        format_change_notice, format_failure_notice, format_no_change_notice,
        format_startup_notice, truncate_for_delivery,
    },
    messaging::port::MessagingPort,
    ports::{Clock, HomeworkSource},
    validation::{parse_status, ApiResponse},
    Result,
};

/// What happened to the rendered message of a cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Identical to the last delivered text; not sent again.
    Duplicate,
    Failed,
}

#[derive(Clone, Debug)]
pub struct CycleOutcome {
    pub message: String,
    pub delivery: Delivery,
    /// The fetch/validation chain failed and `message` is a failure report.
    pub failed: bool,
    /// Where the message landed, when it was sent this cycle.
    pub sent: Option<MessageRef>,
}

pub struct PollLoop {
    source: Arc<dyn HomeworkSource>,
    messenger: Arc<dyn MessagingPort>,
    clock: Arc<dyn Clock>,
    chat_id: ChatId,
    retry_period: Duration,
    announce_startup: bool,

    watermark: Watermark,
    last_message: Option<String>,
}

impl PollLoop {
    pub fn new(
        cfg: &Config,
        source: Arc<dyn HomeworkSource>,
        messenger: Arc<dyn MessagingPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let watermark = clock.now();
        Self {
            source,
            messenger,
            clock,
            chat_id: cfg.credentials.chat_id.clone(),
            retry_period: cfg.retry_period,
            announce_startup: cfg.announce_startup,
            watermark,
            last_message: None,
        }
    }

    pub fn watermark(&self) -> Watermark {
        self.watermark
    }

    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Poll forever. Only process termination stops this.
    pub async fn run(mut self) {
        if self.announce_startup {
            self.announce().await;
        }
        info!(
            endpoint = self.source.endpoint(),
            retry_period_secs = self.retry_period.as_secs(),
            from_date = self.watermark.0,
            "polling started"
        );

        loop {
            let outcome = self.run_once().await;
            debug!(
                delivery = ?outcome.delivery,
                failed = outcome.failed,
                from_date = self.watermark.0,
                "cycle finished"
            );
            self.clock.sleep(self.retry_period).await;
        }
    }

    /// Send the startup notice. It does not take part in dedup.
    pub async fn announce(&self) {
        let text = format_startup_notice();
        match self.messenger.send_text(&self.chat_id, &text).await {
            Ok(sent) => info!(message_id = sent.message_id.0, "startup notice delivered"),
            Err(e) => error!(error = %e, "startup notice delivery failed"),
        }
    }

    /// One fetch → validate → notify cycle.
    pub async fn run_once(&mut self) -> CycleOutcome {
        match self.check().await {
            Ok((message, current_date)) => {
                let (delivery, sent) = self.notify(&message).await;
                // A failed send keeps the window so the next cycle sees the change again.
                if delivery != Delivery::Failed {
                    if let Some(next) = current_date {
                        self.watermark = next;
                    }
                }
                CycleOutcome {
                    message,
                    delivery,
                    failed: false,
                    sent,
                }
            }
            Err(err) => {
                self.log_failure(&err);
                let message = format_failure_notice(&err);
                let (delivery, sent) = self.notify(&message).await;
                CycleOutcome {
                    message,
                    delivery,
                    failed: true,
                    sent,
                }
            }
        }
    }

    async fn check(&self) -> Result<(String, Option<Watermark>)> {
        let document = self.source.fetch_homeworks(self.watermark).await?;
        let response = ApiResponse::validate(document)?;

        let message = match response.latest() {
            None => {
                debug!(from_date = self.watermark.0, "no new homework statuses");
                format_no_change_notice()
            }
            Some(record) => {
                let change = parse_status(record)?;
                info!(
                    homework = %change.homework_name,
                    status = change.status.code(),
                    "homework status received"
                );
                format_change_notice(&change.homework_name, change.verdict())
            }
        };

        Ok((message, response.current_date))
    }

    /// Deliver `message` unless it equals the last delivered text.
    async fn notify(&mut self, message: &str) -> (Delivery, Option<MessageRef>) {
        if self.last_message.as_deref() == Some(message) {
            debug!("message unchanged since last delivery, skipping");
            return (Delivery::Duplicate, None);
        }

        let max_len = self.messenger.capabilities().max_message_len;
        let text = truncate_for_delivery(message, max_len);
        if text.len() < message.len() {
            warn!(
                original_len = message.len(),
                max_len, "message truncated for delivery"
            );
        }

        match self.messenger.send_text(&self.chat_id, text).await {
            Ok(sent) => {
                debug!(message_id = sent.message_id.0, text = message, "message delivered");
                self.last_message = Some(message.to_string());
                (Delivery::Sent, Some(sent))
            }
            // Swallowed: reporting a delivery failure would need the same channel.
            Err(e) => {
                error!(error = %e, text = message, "message delivery failed");
                (Delivery::Failed, None)
            }
        }
    }

    fn log_failure(&self, err: &Error) {
        let endpoint = self.source.endpoint();
        match err {
            Error::Transport { .. } => {
                error!(error = %err, endpoint, "homework API unreachable")
            }
            Error::Access { status, .. } => {
                error!(error = %err, endpoint, status, "homework API refused access")
            }
            Error::ServerRejection { .. } => {
                error!(error = %err, endpoint, "homework API rejected the request")
            }
            Error::MalformedPayload { .. }
            | Error::InvalidResponseShape { .. }
            | Error::MissingField { .. }
            | Error::InvalidFieldType { .. } => {
                error!(error = %err, endpoint, "homework API response failed validation")
            }
            Error::UnknownStatus { status } => {
                error!(error = %err, status = %status, "unrecognized homework status, API contract may have changed")
            }
            other => error!(error = %other, "unexpected fault in poll cycle"),
        }
    }
}
