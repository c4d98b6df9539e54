// src/utils/system.rs: System functions

use anyhow::{anyhow, Result};
use sysinfo::{MemoryRefreshKind, RefreshKind, System};


/// Source of the thread count handed to external tools.
pub trait CapacityQuery: Send + Sync {
    /// Usable execution units on this host. Never less than 1.
    fn execution_units(&self) -> usize;
}


/// Cores this process may run on (affinity and cgroup aware), optionally capped.
#[derive(Debug, Clone, Default)]
pub struct HostCapacity {
    pub limit: Option<usize>,
}

impl HostCapacity {
    pub fn new(limit: Option<usize>) -> Self {
        HostCapacity { limit }
    }
}

impl CapacityQuery for HostCapacity {
    fn execution_units(&self) -> usize {
        let cores = num_cpus::get().max(1);
        match self.limit {
            Some(limit) => cores.min(limit.max(1)),
            None => cores,
        }
    }
}


#[derive(Debug, Clone, Copy)]
pub struct FixedCapacity(pub usize);

impl CapacityQuery for FixedCapacity {
    fn execution_units(&self) -> usize {
        self.0.max(1)
    }
}


/// Finds the amount of total and available RAM
///
/// # Returns
///
/// Result<u64, u64> total ram, available ram
pub fn detect_ram() -> Result<(u64, u64)> {
    let refresh_kind = RefreshKind::nothing().with_memory(MemoryRefreshKind::everything());
    let mut system = System::new_with_specifics(refresh_kind);
    system.refresh_memory();
    let (total_ram, available_ram) = (system.total_memory(), system.available_memory());

    if total_ram == 0 {
        return Err(anyhow!("Failed to detect valid RAM values"));
    }

    Ok((total_ram, available_ram))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_capacity_at_least_one() {
        assert!(HostCapacity::default().execution_units() >= 1);
        assert_eq!(HostCapacity::new(Some(1)).execution_units(), 1);
        assert_eq!(HostCapacity::new(Some(0)).execution_units(), 1);
    }

    #[test]
    fn test_host_capacity_limit_never_exceeds_cores() {
        let cores = HostCapacity::default().execution_units();
        assert_eq!(HostCapacity::new(Some(cores + 64)).execution_units(), cores);
    }

    #[test]
    fn test_fixed_capacity() {
        assert_eq!(FixedCapacity(8).execution_units(), 8);
        assert_eq!(FixedCapacity(0).execution_units(), 1);
    }
}
