//! Binding context for a paired walk of two lambda bodies.
//!
//! Parameters, captures and locals are positional, so correspondence needs
//! no renaming table: a slot on the left matches a slot on the right exactly
//! when both are the same kind at the same index (plus, for captures, the
//! same capture type and, under [`CapturePolicy::Identity`], the same
//! captured variable). Resolved symbols never rename.
//!
//! A context is built per lambda-vs-lambda comparison and dropped with it.
//! Slot ranges are validated by the caller before a context is consulted.

use closure_ir::{Lambda, Slot};

use crate::options::CapturePolicy;

pub struct BindingContext<'a> {
    left: &'a Lambda,
    right: &'a Lambda,
    policy: CapturePolicy,
}

impl<'a> BindingContext<'a> {
    pub fn new(left: &'a Lambda, right: &'a Lambda, policy: CapturePolicy) -> Self {
        Self {
            left,
            right,
            policy,
        }
    }

    /// Context comparing a lambda against itself.
    pub fn identity(lambda: &'a Lambda, policy: CapturePolicy) -> Self {
        Self::new(lambda, lambda, policy)
    }

    /// Whether `left` (in the left lambda) and `right` (in the right lambda)
    /// denote the same position.
    pub fn slots_match(&self, left: Slot, right: Slot) -> bool {
        match (left, right) {
            (Slot::Param(l), Slot::Param(r)) | (Slot::Local(l), Slot::Local(r)) => l == r,
            (Slot::Capture(l), Slot::Capture(r)) => l == r && self.captures_match(l),
            (Slot::Symbol(l), Slot::Symbol(r)) => l == r,
            _ => false,
        }
    }

    /// Compare the captures at `index` on both sides.
    fn captures_match(&self, index: u32) -> bool {
        let index = index as usize;
        match (self.left.captures.get(index), self.right.captures.get(index)) {
            (Some(l), Some(r)) => {
                l.ty == r.ty && (self.policy == CapturePolicy::Positional || l.var == r.var)
            }
            _ => false,
        }
    }
}
