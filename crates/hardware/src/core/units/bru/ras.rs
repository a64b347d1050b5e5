//! Return Address Stack (RAS).
//!
//! Pushed by BSR, JSR and JSR_COROUTINE and popped by RET and
//! JSR_COROUTINE as they are fetched. A squash does not repair it; a wrong
//! return prediction is caught like any other misprediction.

/// Return Address Stack structure.
#[derive(Clone, Debug)]
pub struct Ras {
    /// The stack storage.
    stack: Vec<u64>,
    /// Current stack pointer index.
    ptr: usize,
}

impl Ras {
    /// Creates a new Return Address Stack with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            stack: vec![0; capacity.max(1)],
            ptr: 0,
        }
    }

    /// Pushes a return address.
    ///
    /// When the stack is full the oldest entry is discarded.
    pub fn push(&mut self, addr: u64) {
        if self.ptr == self.stack.len() {
            let _ = self.stack.remove(0);
            self.stack.push(addr);
        } else {
            self.stack[self.ptr] = addr;
            self.ptr += 1;
        }
    }

    /// Pops a return address, or `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<u64> {
        if self.ptr == 0 {
            None
        } else {
            self.ptr -= 1;
            Some(self.stack[self.ptr])
        }
    }

    /// Peeks at the top of the stack without removing the entry.
    pub fn top(&self) -> Option<u64> {
        self.ptr.checked_sub(1).map(|i| self.stack[i])
    }
}
