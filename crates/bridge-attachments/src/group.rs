//! `MediaGroupCollector`: buffers attachments sharing a chat-platform
//! media-group id for a short quiet period, then yields the whole album
//! at once. Non-grouped attachments bypass buffering entirely.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

struct GroupState<T> {
    items: Vec<T>,
    generation: u64,
}

/// Collects items of type `T` that arrive tagged with a media-group id,
/// debouncing on a quiet period before yielding the group on `output`.
pub struct MediaGroupCollector<T> {
    timeout: Duration,
    groups: Arc<Mutex<HashMap<String, GroupState<T>>>>,
    output: mpsc::UnboundedSender<Vec<T>>,
}

impl<T: Send + 'static> MediaGroupCollector<T> {
    pub fn new(timeout: Duration) -> (Self, mpsc::UnboundedReceiver<Vec<T>>) {
        let (output, rx) = mpsc::unbounded_channel();
        (Self { timeout, groups: Arc::new(Mutex::new(HashMap::new())), output }, rx)
    }

    /// A standalone attachment with no media-group id: yielded immediately.
    pub fn push_single(&self, item: T) {
        let _ = self.output.send(vec![item]);
    }

    /// One more item of an album. Resets that group's quiet-period timer;
    /// the group is yielded once `timeout` passes with no further pushes.
    pub fn push_grouped(&self, group_id: String, item: T) {
        let generation = {
            let mut groups = self.groups.lock().unwrap();
            let state = groups.entry(group_id.clone()).or_insert_with(|| GroupState { items: Vec::new(), generation: 0 });
            state.items.push(item);
            state.generation += 1;
            state.generation
        };

        let groups = self.groups.clone();
        let output = self.output.clone();
        let timeout = self.timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let finished = {
                let mut groups = groups.lock().unwrap();
                match groups.get(&group_id) {
                    Some(state) if state.generation == generation => groups.remove(&group_id).map(|s| s.items),
                    _ => None,
                }
            };
            if let Some(items) = finished {
                let _ = output.send(items);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    async fn settle() {
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn single_item_yields_immediately() {
        let (collector, mut rx) = MediaGroupCollector::new(Duration::from_secs(1));
        collector.push_single("only");
        let group = rx.recv().await.unwrap();
        assert_eq!(group, vec!["only"]);
    }

    #[tokio::test(start_paused = true)]
    async fn grouped_items_yield_together_after_quiet_period() {
        let (collector, mut rx) = MediaGroupCollector::new(Duration::from_secs(1));
        collector.push_grouped("album-1".to_string(), "a");
        settle().await;
        advance(Duration::from_millis(400)).await;
        collector.push_grouped("album-1".to_string(), "b");
        settle().await;
        advance(Duration::from_millis(400)).await;
        collector.push_grouped("album-1".to_string(), "c");
        settle().await;

        advance(Duration::from_millis(1100)).await;
        let group = rx.recv().await.unwrap();
        assert_eq!(group, vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_groups_stay_independent() {
        let (collector, mut rx) = MediaGroupCollector::new(Duration::from_millis(500));
        collector.push_grouped("g1".to_string(), 1);
        collector.push_grouped("g2".to_string(), 2);
        settle().await;
        advance(Duration::from_millis(600)).await;

        let mut seen = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
        seen.sort();
        assert_eq!(seen, vec![vec![1], vec![2]]);
    }

    #[tokio::test(start_paused = true)]
    async fn late_arrival_extends_the_window_exactly_once() {
        let (collector, mut rx) = MediaGroupCollector::new(Duration::from_secs(1));
        collector.push_grouped("album-1".to_string(), "a");
        settle().await;
        advance(Duration::from_millis(999)).await;
        collector.push_grouped("album-1".to_string(), "b");
        settle().await;
        advance(Duration::from_millis(999)).await;
        assert!(rx.try_recv().is_err());
        advance(Duration::from_millis(2)).await;
        let group = rx.recv().await.unwrap();
        assert_eq!(group, vec!["a", "b"]);
    }
}
