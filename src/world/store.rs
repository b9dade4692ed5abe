// ============================================
// Chunk Store - Загруженные чанки
// ============================================
// Арена слотов + индекс по координате. Явная очистка через sink

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::world::cache::ChunkCoord;
use crate::world::chunk::Chunk;
use crate::world::sink::{ChunkSink, SinkError};

struct Slot<H> {
    chunk: Chunk,
    handle: H,
}

/// Ошибки вставки
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Координата уже загружена; вставка не перезаписывает
    Occupied(ChunkCoord),
    /// Движок не смог выделить ресурсы; чанк не вставлен
    Allocation { coord: ChunkCoord, source: SinkError },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Occupied(coord) => write!(f, "chunk {} is already loaded", coord),
            StoreError::Allocation { coord, source } => {
                write!(f, "failed to allocate chunk {}: {}", coord, source)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Allocation { source, .. } => Some(source),
            StoreError::Occupied(_) => None,
        }
    }
}

/// Единственный владелец живых чанков
pub struct ChunkStore<S: ChunkSink> {
    slots: Vec<Option<Slot<S::Handle>>>,
    free: Vec<usize>,
    index: HashMap<ChunkCoord, usize>,
    sink: S,
}

impl<S: ChunkSink> ChunkStore<S> {
    pub fn new(sink: S) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::with_capacity(64),
            sink,
        }
    }

    pub fn has(&self, coord: ChunkCoord) -> bool {
        self.index.contains_key(&coord)
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.slot(coord).map(|slot| &slot.chunk)
    }

    /// Ресурсы движка для чанка
    pub fn handle(&self, coord: ChunkCoord) -> Option<&S::Handle> {
        self.slot(coord).map(|slot| &slot.handle)
    }

    fn slot(&self, coord: ChunkCoord) -> Option<&Slot<S::Handle>> {
        let &i = self.index.get(&coord)?;
        self.slots[i].as_ref()
    }

    pub fn insert(&mut self, coord: ChunkCoord, chunk: Chunk) -> Result<(), StoreError> {
        if self.has(coord) {
            return Err(StoreError::Occupied(coord));
        }

        let handle = self
            .sink
            .allocate(&chunk)
            .map_err(|source| StoreError::Allocation { coord, source })?;

        let slot = Some(Slot { chunk, handle });
        let i = match self.free.pop() {
            Some(i) => {
                self.slots[i] = slot;
                i
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };
        self.index.insert(coord, i);
        Ok(())
    }

    /// Выгрузить чанк и освободить его ресурсы. false если координаты нет
    pub fn remove(&mut self, coord: ChunkCoord) -> bool {
        let Some(i) = self.index.remove(&coord) else {
            return false;
        };
        if let Some(slot) = self.slots[i].take() {
            self.sink.release(coord, slot.handle);
        }
        self.free.push(i);
        true
    }

    pub fn coordinates(&self) -> HashSet<ChunkCoord> {
        self.index.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.slots.iter().flatten().map(|slot| &slot.chunk)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Выгрузить всё
    pub fn clear(&mut self) {
        for (coord, i) in self.index.drain() {
            if let Some(slot) = self.slots[i].take() {
                self.sink.release(coord, slot.handle);
            }
        }
        self.slots.clear();
        self.free.clear();
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: ChunkSink> Drop for ChunkStore<S> {
    fn drop(&mut self) {
        // Ресурсы движка освобождаются только через sink
        self.clear();
    }
}
