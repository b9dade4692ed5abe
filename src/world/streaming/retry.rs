// ============================================
// Retry Queue - Повтор неудачных аллокаций
// ============================================

use std::collections::HashMap;

use crate::world::cache::ChunkCoord;

#[derive(Debug, Clone, Copy)]
struct RetryEntry {
    failures: u32,
    next_pass: u64,
}

/// Экспоненциальная пауза по координате: 1, 2, 4 ... max_backoff проходов
#[derive(Debug)]
pub(super) struct RetryQueue {
    entries: HashMap<ChunkCoord, RetryEntry>,
    max_backoff: u32,
}

impl RetryQueue {
    pub fn new(max_backoff: u32) -> Self {
        Self {
            entries: HashMap::new(),
            max_backoff: max_backoff.max(1),
        }
    }

    /// Запланировать повтор; возвращает номер прохода
    pub fn schedule(&mut self, coord: ChunkCoord, pass: u64) -> u64 {
        let entry = self.entries.entry(coord).or_insert(RetryEntry {
            failures: 0,
            next_pass: pass,
        });
        entry.failures += 1;
        let delay = 1u64
            .checked_shl(entry.failures - 1)
            .unwrap_or(u64::MAX)
            .min(self.max_backoff as u64);
        entry.next_pass = pass + delay;
        entry.next_pass
    }

    /// Координата ещё ждёт своей очереди
    pub fn is_waiting(&self, coord: ChunkCoord, pass: u64) -> bool {
        self.entries
            .get(&coord)
            .map_or(false, |entry| pass < entry.next_pass)
    }

    pub fn has_due(&self, pass: u64) -> bool {
        self.entries.values().any(|entry| pass >= entry.next_pass)
    }

    pub fn clear(&mut self, coord: ChunkCoord) {
        self.entries.remove(&coord);
    }

    pub fn retain(&mut self, mut keep: impl FnMut(ChunkCoord) -> bool) {
        self.entries.retain(|coord, _| keep(*coord));
    }

    pub fn failures(&self, coord: ChunkCoord) -> u32 {
        self.entries.get(&coord).map_or(0, |entry| entry.failures)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let mut queue = RetryQueue::new(4);
        let c = ChunkCoord::new(1, 1);

        assert_eq!(queue.schedule(c, 10), 11);
        assert_eq!(queue.schedule(c, 11), 13);
        assert_eq!(queue.schedule(c, 13), 17);
        assert_eq!(queue.schedule(c, 17), 21);
        assert_eq!(queue.schedule(c, 21), 25);
        assert_eq!(queue.failures(c), 5);
    }

    #[test]
    fn test_waiting_and_due() {
        let mut queue = RetryQueue::new(8);
        let c = ChunkCoord::new(0, 0);
        queue.schedule(c, 1);
        queue.schedule(c, 2);

        assert!(queue.is_waiting(c, 3));
        assert!(!queue.has_due(3));
        assert!(!queue.is_waiting(c, 4));
        assert!(queue.has_due(4));

        queue.clear(c);
        assert_eq!(queue.len(), 0);
        assert!(!queue.is_waiting(c, 0));
    }

    #[test]
    fn test_retain_drops_far_entries() {
        let mut queue = RetryQueue::new(8);
        queue.schedule(ChunkCoord::new(0, 0), 0);
        queue.schedule(ChunkCoord::new(9, 9), 0);
        queue.retain(|c| c.x < 5);
        assert_eq!(queue.len(), 1);
    }
}
