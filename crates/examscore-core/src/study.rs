//! Study subjects, sessions, daily plans and goal tracking.
//!
//! Sessions and plans refer to their subject by id. Notification delivery is
//! left to a [`GoalNotifier`] implementation.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subjects a fresh study log starts with, as (name, color) pairs.
pub const DEFAULT_SUBJECTS: [(&str, &str); 13] = [
    ("Anatomi", "#E74C3C"),
    ("Fizyoloji", "#E67E22"),
    ("Biyokimya", "#F1C40F"),
    ("Mikrobiyoloji", "#2ECC71"),
    ("Patoloji", "#9B59B6"),
    ("Farmakoloji", "#3498DB"),
    ("Dahiliye", "#34495E"),
    ("Pediatri", "#1ABC9C"),
    ("Genel Cerrahi", "#E91E63"),
    ("Kadın Doğum", "#D35400"),
    ("Küçük Stajlar", "#7F8C8D"),
    ("Deneme Çözümü", "#000000"),
    ("Genel Tekrar", "#FFFFFF"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub color_hex: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_repetitions")]
    pub repetition_count: u32,
}

fn default_repetitions() -> u32 {
    1
}

impl Subject {
    pub fn new(name: impl Into<String>, color_hex: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color_hex: color_hex.into(),
            created_at: Utc::now(),
            repetition_count: default_repetitions(),
        }
    }
}

/// Build the default subject list with fresh ids.
pub fn default_subjects() -> Vec<Subject> {
    DEFAULT_SUBJECTS
        .iter()
        .map(|(name, color)| Subject::new(*name, *color))
        .collect()
}

/// A finished (or manually entered) block of study time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Duration,
}

impl StudySession {
    pub fn new(subject_id: Uuid, start_time: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id,
            start_time,
            end_time: chrono::Duration::from_std(duration)
                .ok()
                .and_then(|d| start_time.checked_add_signed(d)),
            duration,
        }
    }
}

/// A study target for one subject on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub target_date: NaiveDate,
    pub target_duration: Duration,
    #[serde(default)]
    pub is_completed: bool,
}

impl StudyPlan {
    pub fn new(subject_id: Uuid, target_date: NaiveDate, target_duration: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id,
            target_date,
            target_duration,
            is_completed: false,
        }
    }
}

/// Total time studied on a subject during `day` (UTC).
pub fn studied_on(subject_id: Uuid, day: NaiveDate, sessions: &[StudySession]) -> Duration {
    sessions
        .iter()
        .filter(|s| s.subject_id == subject_id && s.start_time.date_naive() == day)
        .map(|s| s.duration)
        .sum()
}

/// Emitted when a subject's daily target is met.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalReached {
    pub subject_id: Uuid,
    pub subject_name: String,
    pub day: NaiveDate,
    pub target: Duration,
    pub studied: Duration,
}

/// Delivers goal events (system notification, log line, ...).
pub trait GoalNotifier: Send + Sync {
    fn goal_reached(&self, event: &GoalReached);
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl GoalNotifier for TracingNotifier {
    fn goal_reached(&self, event: &GoalReached) {
        tracing::info!(
            subject = %event.subject_name,
            day = %event.day,
            studied_secs = event.studied.as_secs(),
            target_secs = event.target.as_secs(),
            "daily study goal reached"
        );
    }
}

/// Checks daily goals as a timer runs and notifies once per subject per day.
pub struct GoalTracker<N: GoalNotifier = TracingNotifier> {
    notifier: N,
    notified: HashSet<(Uuid, NaiveDate)>,
}

impl Default for GoalTracker<TracingNotifier> {
    fn default() -> Self {
        Self::new(TracingNotifier)
    }
}

impl<N: GoalNotifier> GoalTracker<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            notifier,
            notified: HashSet::new(),
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Check the goal for `subject` on `today`.
    ///
    /// `live_elapsed` is the running timer not yet stored as a session. Only
    /// the first plan for the subject on that day counts. Returns the event
    /// when one was emitted. Notifications remembered for days before `today`
    /// are forgotten.
    pub fn check(
        &mut self,
        subject: &Subject,
        today: NaiveDate,
        plans: &[StudyPlan],
        sessions: &[StudySession],
        live_elapsed: Duration,
    ) -> Option<GoalReached> {
        self.notified.retain(|(_, day)| *day >= today);

        let key = (subject.id, today);
        if self.notified.contains(&key) {
            return None;
        }

        let plan = plans
            .iter()
            .find(|p| p.subject_id == subject.id && p.target_date == today)?;

        let studied = studied_on(subject.id, today, sessions) + live_elapsed;
        if studied < plan.target_duration {
            return None;
        }

        let event = GoalReached {
            subject_id: subject.id,
            subject_name: subject.name.clone(),
            day: today,
            target: plan.target_duration,
            studied,
        };
        self.notified.insert(key);
        self.notifier.goal_reached(&event);
        Some(event)
    }

    /// Whether the goal for a subject was already announced on `day`.
    pub fn was_notified(&self, subject_id: Uuid, day: NaiveDate) -> bool {
        self.notified.contains(&(subject_id, day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<GoalReached>>,
    }

    impl GoalNotifier for RecordingNotifier {
        fn goal_reached(&self, event: &GoalReached) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    fn at(d: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, d, hour, 0, 0).unwrap()
    }

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn default_subject_list() {
        let subjects = default_subjects();
        assert_eq!(subjects.len(), 13);
        assert_eq!(subjects[0].name, "Anatomi");
        assert_eq!(subjects[12].color_hex, "#FFFFFF");
        assert!(subjects.iter().all(|s| s.repetition_count == 1));
        let ids: HashSet<Uuid> = subjects.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 13);
    }

    #[test]
    fn studied_time_counts_only_that_subject_and_day() {
        let anatomy = Subject::new("Anatomi", "#E74C3C");
        let other = Subject::new("Patoloji", "#9B59B6");
        let sessions = vec![
            StudySession::new(anatomy.id, at(3, 8), HOUR),
            StudySession::new(anatomy.id, at(3, 14), HOUR / 2),
            StudySession::new(anatomy.id, at(2, 14), HOUR),
            StudySession::new(other.id, at(3, 9), HOUR),
        ];
        assert_eq!(
            studied_on(anatomy.id, day(3), &sessions),
            HOUR + HOUR / 2
        );
    }

    #[test]
    fn session_end_time_follows_duration() {
        let session = StudySession::new(Uuid::new_v4(), at(3, 8), HOUR);
        assert_eq!(session.end_time, Some(at(3, 9)));
    }

    #[test]
    fn goal_fires_once_per_day() {
        let subject = Subject::new("Dahiliye", "#34495E");
        let plans = vec![StudyPlan::new(subject.id, day(5), 2 * HOUR)];
        let sessions = vec![StudySession::new(subject.id, at(5, 7), HOUR)];
        let mut tracker = GoalTracker::new(RecordingNotifier::default());

        assert!(tracker
            .check(&subject, day(5), &plans, &sessions, HOUR / 2)
            .is_none());

        let event = tracker
            .check(&subject, day(5), &plans, &sessions, HOUR)
            .unwrap();
        assert_eq!(event.studied, 2 * HOUR);
        assert_eq!(event.subject_name, "Dahiliye");

        assert!(tracker
            .check(&subject, day(5), &plans, &sessions, 3 * HOUR)
            .is_none());
        assert!(tracker.was_notified(subject.id, day(5)));
        assert_eq!(tracker.notifier().events.lock().unwrap().len(), 1);
    }

    #[test]
    fn no_plan_means_no_goal() {
        let subject = Subject::new("Pediatri", "#1ABC9C");
        let plans = vec![StudyPlan::new(subject.id, day(6), HOUR)];
        let mut tracker = GoalTracker::new(RecordingNotifier::default());

        assert!(tracker
            .check(&subject, day(5), &plans, &[], 10 * HOUR)
            .is_none());
        assert!(tracker.notifier().events.lock().unwrap().is_empty());
    }

    #[test]
    fn next_day_can_fire_again() {
        let subject = Subject::new("Anatomi", "#E74C3C");
        let plans = vec![
            StudyPlan::new(subject.id, day(5), HOUR),
            StudyPlan::new(subject.id, day(6), HOUR),
        ];
        let mut tracker: GoalTracker = GoalTracker::default();

        assert!(tracker.check(&subject, day(5), &plans, &[], HOUR).is_some());
        assert!(tracker.check(&subject, day(6), &plans, &[], HOUR).is_some());
    }

    #[test]
    fn past_days_are_forgotten() {
        let first = Subject::new("Anatomi", "#E74C3C");
        let second = Subject::new("Patoloji", "#9B59B6");
        let plans = vec![
            StudyPlan::new(first.id, day(5), HOUR),
            StudyPlan::new(second.id, day(6), HOUR),
        ];
        let mut tracker = GoalTracker::new(RecordingNotifier::default());

        assert!(tracker.check(&first, day(5), &plans, &[], HOUR).is_some());
        assert!(tracker.was_notified(first.id, day(5)));

        assert!(tracker.check(&second, day(6), &plans, &[], HOUR).is_some());
        assert!(!tracker.was_notified(first.id, day(5)));
        assert!(tracker.was_notified(second.id, day(6)));
        assert_eq!(tracker.notified.len(), 1);
    }

    #[test]
    fn plan_serializes_camel_case() {
        let plan = StudyPlan::new(Uuid::nil(), day(5), HOUR);
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["targetDate"], "2025-04-05");
        assert_eq!(json["isCompleted"], false);
        let back: StudyPlan = serde_json::from_value(json).unwrap();
        assert_eq!(back, plan);
    }
}
