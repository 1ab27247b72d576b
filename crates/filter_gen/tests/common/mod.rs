//! Helpers shared by the integration tests.

use std::collections::VecDeque;

use rand::RngCore;

/// Replays a fixed list of draws and panics when it runs dry.
pub struct Script(VecDeque<u32>);

impl Script {
    pub fn new(draws: &[u32]) -> Self {
        Self(draws.iter().copied().collect())
    }

    #[allow(dead_code)]
    pub fn remaining(&self) -> usize {
        self.0.len()
    }
}

impl RngCore for Script {
    fn next_u32(&mut self) -> u32 {
        self.0.pop_front().expect("script exhausted")
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill_with(|| self.next_u32() as u8);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
