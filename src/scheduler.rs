use crate::Error;
use heapdict::HeapDict;
use log::{debug, info, warn};
use parking_lot::RwLock;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[derive(Debug, Deserialize, Clone)]
pub struct TaskConfig {
    pub name: String,
    #[serde(default)]
    pub after_ms: u64,
    #[serde(default)]
    pub jitter_ms: u64,
    #[serde(default)]
    pub cancel: bool,
}

impl TaskConfig {
    pub fn to_command(&self, now: Instant) -> Command {
        if self.cancel {
            return Command::Cancel(self.name.clone());
        }
        let jitter = if self.jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.jitter_ms)
        };
        Command::Schedule {
            name: self.name.clone(),
            at: now + Duration::from_millis(self.after_ms.saturating_add(jitter)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Adds the task, or moves it to `at` if it is already pending.
    Schedule { name: String, at: Instant },
    Cancel(String),
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Fired {
    pub name: String,
    pub late_ms: u64,
}

/// Pending tasks by deadline. The lock is the only synchronization;
/// `HeapDict` itself has none.
#[derive(Debug, Default)]
pub struct Timetable {
    pending: RwLock<HeapDict<String, Instant>>,
}

impl Timetable {
    pub fn len(&self) -> usize {
        self.pending.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.read().is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pending.read().contains_key(name)
    }

    pub fn deadline(&self, name: &str) -> Option<Instant> {
        self.pending.read().get(name).ok().copied()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.read().peek().ok().map(|(_, &at)| at)
    }

    fn apply(&self, command: Command) {
        match command {
            Command::Schedule { name, at } => {
                let mut pending = self.pending.write();
                if pending.set(name.clone(), at).is_some() {
                    debug!("rescheduled {name}");
                } else {
                    debug!("scheduled {name}");
                }
            }
            Command::Cancel(name) => match self.pending.write().remove(name.as_str()) {
                Ok(_) => debug!("cancelled {name}"),
                Err(e) => warn!("cancel {name}: {e}"),
            },
        }
    }

    /// Removes and returns every task due at or before `now`, earliest first.
    fn pop_due(&self, now: Instant) -> Vec<(String, Instant)> {
        let mut pending = self.pending.write();
        let mut due = Vec::new();
        while let Ok((_, &at)) = pending.peek() {
            if at > now {
                break;
            }
            match pending.pop() {
                Ok(e) => due.push(e),
                Err(_) => break,
            }
        }
        due
    }
}

/// Applies `commands` to `timetable` and reports each task on `fired` once
/// its deadline passes. Returns after the command channel closes and nothing
/// is left pending.
pub async fn run(
    timetable: Arc<Timetable>,
    mut commands: mpsc::Receiver<Command>,
    fired: mpsc::UnboundedSender<Fired>,
) -> Result<(), Error> {
    let far_future = far_future();
    let mut open = true;
    loop {
        let until = timetable.next_deadline();
        if !open && until.is_none() {
            break;
        }
        tokio::select! {
            m = commands.recv(), if open => {
                match m {
                    Some(c) => timetable.apply(c),
                    None => open = false,
                }
            }
            _ = tokio::time::sleep_until(until.unwrap_or(far_future)) => {
                let now = Instant::now();
                for (name, at) in timetable.pop_due(now) {
                    let late_ms = now.duration_since(at).as_millis() as u64;
                    info!("fired {name} ({late_ms} ms late)");
                    fired.send(Fired { name, late_ms }).map_err(|_| {
                        Error::Internal(anyhow::anyhow!("fired receiver dropped").into())
                    })?;
                }
            }
        }
    }
    Ok(())
}

// There is no `Instant::MAX`; 30 years is far enough and does not overflow.
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86400 * 365 * 30)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn schedule(name: &str, at: Instant) -> Command {
        Command::Schedule {
            name: name.to_string(),
            at,
        }
    }

    #[test]
    fn pop_due_stops_at_future_deadline() {
        let t = Timetable::default();
        let now = Instant::now();
        t.apply(schedule("late", now + ms(500)));
        t.apply(schedule("b", now));
        t.apply(schedule("a", now - ms(10)));
        assert_eq!(t.next_deadline(), Some(now - ms(10)));
        let due: Vec<_> = t.pop_due(now).into_iter().map(|(n, _)| n).collect();
        assert_eq!(due, ["a", "b"]);
        assert!(t.contains("late"));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn reschedule_and_cancel() {
        let t = Timetable::default();
        let now = Instant::now();
        t.apply(schedule("x", now + ms(100)));
        t.apply(schedule("x", now + ms(20)));
        assert_eq!(t.deadline("x"), Some(now + ms(20)));
        t.apply(Command::Cancel("x".to_string()));
        t.apply(Command::Cancel("missing".to_string()));
        assert!(t.is_empty());
    }

    #[test]
    fn task_config_commands() {
        let now = Instant::now();
        let task = TaskConfig {
            name: "flush".to_string(),
            after_ms: 100,
            jitter_ms: 0,
            cancel: false,
        };
        assert_eq!(task.to_command(now), schedule("flush", now + ms(100)));
        let jittered = TaskConfig {
            jitter_ms: 50,
            ..task.clone()
        };
        match jittered.to_command(now) {
            Command::Schedule { at, .. } => {
                assert!(now + ms(100) <= at && at <= now + ms(150));
            }
            c => panic!("unexpected {c:?}"),
        }
        let cancel = TaskConfig {
            cancel: true,
            ..task
        };
        assert_eq!(cancel.to_command(now), Command::Cancel("flush".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn fires_in_deadline_order() {
        let timetable = Arc::new(Timetable::default());
        let (sender, receiver) = mpsc::channel(8);
        let (fired_sender, mut fired_receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(timetable.clone(), receiver, fired_sender));
        let now = Instant::now();
        sender.send(schedule("a", now + ms(300))).await.unwrap();
        sender.send(schedule("b", now + ms(100))).await.unwrap();
        sender.send(schedule("c", now + ms(200))).await.unwrap();
        sender.send(schedule("a", now + ms(50))).await.unwrap();
        sender.send(Command::Cancel("c".to_string())).await.unwrap();
        drop(sender);
        handle.await.unwrap().unwrap();
        let mut fired = Vec::new();
        while let Some(f) = fired_receiver.recv().await {
            fired.push(f.name);
        }
        assert_eq!(fired, ["a", "b"]);
        assert!(timetable.is_empty());
        assert!(Instant::now() < now + ms(200));
    }

    #[tokio::test(start_paused = true)]
    async fn commands_arrive_while_waiting() {
        let timetable = Arc::new(Timetable::default());
        let (sender, receiver) = mpsc::channel(8);
        let (fired_sender, mut fired_receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(timetable.clone(), receiver, fired_sender));
        let start = Instant::now();
        sender.send(schedule("slow", start + ms(1000))).await.unwrap();
        tokio::time::sleep(ms(10)).await;
        sender.send(schedule("fast", start + ms(20))).await.unwrap();
        let first = fired_receiver.recv().await.unwrap();
        assert_eq!(first.name, "fast");
        assert!(timetable.contains("slow"));
        sender.send(schedule("slow", start + ms(30))).await.unwrap();
        drop(sender);
        assert_eq!(fired_receiver.recv().await.unwrap().name, "slow");
        handle.await.unwrap().unwrap();
    }
}
