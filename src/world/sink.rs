// ============================================
// Chunk Sink - Ресурсы движка для чанков
// ============================================
// Аллокация при коммите чанка в хранилище, освобождение при выгрузке

use std::fmt;

use crate::world::cache::ChunkCoord;
use crate::world::chunk::{Chunk, ChunkLayout};
use crate::world::instance::ChunkInstances;

/// Коллаборатор движка: превращает дескрипторы в ресурсы
pub trait ChunkSink {
    type Handle;

    fn allocate(&mut self, chunk: &Chunk) -> Result<Self::Handle, SinkError>;

    fn release(&mut self, coord: ChunkCoord, handle: Self::Handle);
}

/// Ошибки аллокации ресурсов (повторяемые)
#[derive(Debug, Clone, PartialEq)]
pub enum SinkError {
    OutOfMemory { requested: usize, available: usize },
    Backend(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::OutOfMemory { requested, available } => write!(
                f,
                "out of instance memory: requested {} bytes, {} available",
                requested, available
            ),
            SinkError::Backend(msg) => write!(f, "backend error: {}", msg),
        }
    }
}

impl std::error::Error for SinkError {}

/// Ничего не аллоцирует (headless/тесты)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ChunkSink for NullSink {
    type Handle = ();

    fn allocate(&mut self, _chunk: &Chunk) -> Result<(), SinkError> {
        Ok(())
    }

    fn release(&mut self, _coord: ChunkCoord, _handle: ()) {}
}

/// Пакует чанки в POD инстанс-буферы с опциональным бюджетом памяти
#[derive(Debug)]
pub struct InstanceSink {
    layout: ChunkLayout,
    budget: Option<usize>,
    used: usize,
}

impl InstanceSink {
    pub fn new(layout: ChunkLayout) -> Self {
        Self {
            layout,
            budget: None,
            used: 0,
        }
    }

    pub fn with_budget(layout: ChunkLayout, budget_bytes: usize) -> Self {
        Self {
            layout,
            budget: Some(budget_bytes),
            used: 0,
        }
    }

    pub fn used_bytes(&self) -> usize {
        self.used
    }

    pub fn set_budget(&mut self, budget_bytes: Option<usize>) {
        self.budget = budget_bytes;
    }
}

impl ChunkSink for InstanceSink {
    type Handle = ChunkInstances;

    fn allocate(&mut self, chunk: &Chunk) -> Result<ChunkInstances, SinkError> {
        let instances = ChunkInstances::from_chunk(chunk, &self.layout);
        let requested = instances.byte_len();

        if let Some(budget) = self.budget {
            let available = budget.saturating_sub(self.used);
            if requested > available {
                return Err(SinkError::OutOfMemory { requested, available });
            }
        }

        self.used += requested;
        Ok(instances)
    }

    fn release(&mut self, _coord: ChunkCoord, handle: ChunkInstances) {
        self.used = self.used.saturating_sub(handle.byte_len());
    }
}
