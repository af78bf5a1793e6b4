//! Notification service: fans bus events out to stakeholders.
//!
//! Delivery is simulated by structured log lines. The most recent
//! notices are kept in a bounded outbox for inspection.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::domain::{Event, EventBus, EventData, EventKind};

/// One delivered notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboxEntry {
    /// Event type that triggered the notice.
    pub event_type: EventKind,
    /// Notice text.
    pub message: String,
    /// Follow-up actions taken.
    pub actions: Vec<String>,
    /// When the notice was produced.
    pub sent_at: DateTime<Utc>,
}

/// Subscribes to every event kind and records a notice per event.
#[derive(Debug)]
pub struct NotificationService {
    outbox: Mutex<VecDeque<OutboxEntry>>,
    capacity: usize,
}

impl NotificationService {
    /// Creates a service keeping at most `capacity` notices.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            outbox: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    /// Subscribes to all event kinds on `bus`.
    pub async fn register_subscriptions(self: &Arc<Self>, bus: &EventBus) {
        for kind in EventKind::ALL {
            let svc = Arc::clone(self);
            bus.subscribe(kind, format!("notifications.{kind}"), move |event| {
                let svc = Arc::clone(&svc);
                async move {
                    svc.deliver(&event).await;
                    anyhow::Ok(())
                }
            })
            .await;
        }
    }

    /// Most recent notices, oldest first.
    pub async fn recent(&self) -> Vec<OutboxEntry> {
        self.outbox.lock().await.iter().cloned().collect()
    }

    async fn deliver(&self, event: &Event) {
        let entry = compose(event);
        tracing::info!(
            event_type = %entry.event_type,
            event_id = %event.id(),
            actions = ?entry.actions,
            "NOTIFICATION: {}",
            entry.message
        );

        if self.capacity == 0 {
            return;
        }
        let mut outbox = self.outbox.lock().await;
        while outbox.len() >= self.capacity {
            outbox.pop_front();
        }
        outbox.push_back(entry);
    }
}

fn compose(event: &Event) -> OutboxEntry {
    let (message, actions) = match event.data() {
        EventData::StudentEnrolled {
            student_id,
            course_id,
            advisor_email,
        } => (
            format!("Student {student_id} enrolled in {course_id}"),
            vec![
                format!("Notifying advisor: {advisor_email}"),
                "Updating billing system for course fees".to_string(),
            ],
        ),
        EventData::StudentDropped {
            student_id,
            course_id,
        } => (
            format!("Student {student_id} dropped {course_id}"),
            vec!["Notifying waitlisted students".to_string()],
        ),
        EventData::GradeSubmitted {
            student_id,
            course_id,
            grade,
        } => (
            format!("Grade {grade} submitted for student {student_id} in {course_id}"),
            vec![
                format!("Emailing student {student_id}"),
                "Informing department administrator".to_string(),
            ],
        ),
        EventData::CourseCreated { course_id, .. } => {
            (format!("New course {course_id} created by admin"), Vec::new())
        }
        EventData::SystemConfigUpdated {
            message,
            notification,
        } => (
            format!("System config update: {message}"),
            vec![format!(
                "Notifying all stakeholders: {}",
                notification
                    .recipients
                    .iter()
                    .map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )],
        ),
    };

    OutboxEntry {
        event_type: event.kind(),
        message,
        actions,
        sent_at: Utc::now(),
    }
}
