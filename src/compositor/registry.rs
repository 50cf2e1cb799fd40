use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Result, SonicGeodeError};
use crate::types::Mesh;

/// A retained `(size, source)` pair, rebuilt every frame.
#[derive(Debug, Clone)]
pub struct SubmeshRecord {
    pub size: f32,
    pub source: Arc<Mesh>,
}

/// Ordered, shareable list of submesh records.
///
/// Cloning the registry clones the handle, not the records, so another
/// thread can register seeds while frames are being rebuilt. The lock is
/// only held to push or to copy the list out.
#[derive(Debug, Clone, Default)]
pub struct SubmeshRegistry {
    records: Arc<Mutex<Vec<SubmeshRecord>>>,
}

impl SubmeshRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, size: f32, source: Arc<Mesh>) -> Result<()> {
        self.lock()?.push(SubmeshRecord { size, source });
        Ok(())
    }

    /// Copy of the records in registration order. Sources are shared.
    pub fn snapshot(&self) -> Result<Vec<SubmeshRecord>> {
        Ok(self.lock()?.clone())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<SubmeshRecord>>> {
        self.records
            .lock()
            .map_err(|_| SonicGeodeError::Compositor("submesh registry lock poisoned".into()))
    }
}
