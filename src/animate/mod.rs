//! # Animation-Coupled Apply Layer
//!
//! Computed geometry is applied either immediately or by handing target
//! values to an external tweening subsystem. The coupling is a two-phase
//! message protocol, not a callback: the rebuild pass pushes
//! [`TweenRequest`] values into an outbox the host drains, and the host
//! reports completion back through the tree's `notify_tween_complete`.
//! The engine never interpolates anything itself.

use crate::model::Vec2;
use crate::tree::ElementId;
use serde::{Deserialize, Serialize};

/// Per-container choice between writing values directly and handing them to
/// the tween subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplyMode {
    #[default]
    Immediate,
    Animated {
        /// Tween duration in seconds.
        duration: f32,
    },
}

/// Identifies one requested tween across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TweenHandle(pub u64);

/// One message to the external tween subsystem.
#[derive(Debug, Clone, PartialEq)]
pub enum TweenRequest {
    Width {
        handle: TweenHandle,
        container: ElementId,
        target: ElementId,
        value: f32,
        duration: f32,
    },
    Height {
        handle: TweenHandle,
        container: ElementId,
        target: ElementId,
        value: f32,
        duration: f32,
    },
    Offset {
        handle: TweenHandle,
        container: ElementId,
        target: ElementId,
        value: Vec2,
        duration: f32,
    },
    /// Stop every tween previously requested for this container.
    CancelAll { container: ElementId },
}

impl TweenRequest {
    /// The container whose rebuild produced this request.
    pub fn container(&self) -> ElementId {
        match self {
            TweenRequest::Width { container, .. }
            | TweenRequest::Height { container, .. }
            | TweenRequest::Offset { container, .. }
            | TweenRequest::CancelAll { container } => *container,
        }
    }
}

/// Outbox of pending tween requests, drained by the host once per tick.
#[derive(Debug, Default)]
pub struct TweenOutbox {
    queue: Vec<TweenRequest>,
    next_handle: u64,
}

impl TweenOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_handle(&mut self) -> TweenHandle {
        self.next_handle += 1;
        TweenHandle(self.next_handle)
    }

    pub fn push_width(
        &mut self,
        container: ElementId,
        target: ElementId,
        value: f32,
        duration: f32,
    ) -> TweenHandle {
        let handle = self.next_handle();
        self.queue.push(TweenRequest::Width {
            handle,
            container,
            target,
            value,
            duration,
        });
        handle
    }

    pub fn push_height(
        &mut self,
        container: ElementId,
        target: ElementId,
        value: f32,
        duration: f32,
    ) -> TweenHandle {
        let handle = self.next_handle();
        self.queue.push(TweenRequest::Height {
            handle,
            container,
            target,
            value,
            duration,
        });
        handle
    }

    pub fn push_offset(
        &mut self,
        container: ElementId,
        target: ElementId,
        value: Vec2,
        duration: f32,
    ) -> TweenHandle {
        let handle = self.next_handle();
        self.queue.push(TweenRequest::Offset {
            handle,
            container,
            target,
            value,
            duration,
        });
        handle
    }

    pub fn push_cancel(&mut self, container: ElementId) {
        self.queue.push(TweenRequest::CancelAll { container });
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Take every pending request, leaving the outbox empty.
    pub fn drain(&mut self) -> Vec<TweenRequest> {
        std::mem::take(&mut self.queue)
    }
}
