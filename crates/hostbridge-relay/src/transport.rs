//! The transport seam between worker logic and the host channel.
//!
//! [`Transport`] is the only interface worker code uses to talk to the
//! host: wait for an inbound frame, send an outbound frame, and peek
//! (non-blocking) for control commands. Concrete pipe/socket relays
//! implement it elsewhere; [`MemoryTransport`] is a scripted in-memory
//! implementation for driving worker logic in tests.

use std::collections::VecDeque;

use bytes::Bytes;

use crate::command::{Command, CommandKind, CommandQueue};
use crate::error::RelayResult;
use crate::frame::{Codec, Frame, InboundFrame};

/// Framed channel to the host process.
pub trait Transport {
    /// Block until the next inbound frame arrives.
    ///
    /// `Ok(None)` means the host requested worker termination (channel
    /// closed). An inbound frame with empty header and empty body means
    /// the same thing and is left to the caller to interpret.
    fn wait_frame(&mut self) -> RelayResult<Option<InboundFrame>>;

    /// Send one outbound frame. The codec hint tells the host which
    /// encoding the frame's header bytes use.
    fn send_frame(&mut self, frame: Frame, codec: Codec) -> RelayResult<()>;

    /// Non-blocking check for a pending control command of the given
    /// kind. Commands of other kinds stay queued.
    fn poll_command(&mut self, kind: CommandKind) -> Option<Command>;
}

/// An outbound frame recorded by [`MemoryTransport`], with its codec hint.
#[derive(Debug, Clone, PartialEq)]
pub struct SentFrame {
    pub frame: Frame,
    pub codec: Codec,
}

/// Scripted in-memory transport.
///
/// Inbound frames and control commands are queued up front;
/// outbound frames are recorded for inspection. A command can also be
/// scheduled to appear after the n-th send, which is how tests model a
/// host that reacts to frames mid-stream.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    inbound: VecDeque<InboundFrame>,
    sent: Vec<SentFrame>,
    commands: CommandQueue,
    scheduled: Vec<(usize, Command)>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            inbound: VecDeque::new(),
            sent: Vec::new(),
            commands: CommandQueue::new(),
            scheduled: Vec::new(),
        }
    }

    /// Queue an inbound frame for the worker to receive.
    pub fn push_inbound(&mut self, header: impl Into<Bytes>, body: impl Into<Bytes>) {
        self.inbound.push_back(InboundFrame::new(header, body));
    }

    /// Queue a control command, available to `poll_command` immediately.
    pub fn push_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Deliver `command` once `after_sends` outbound frames have been
    /// recorded. Models a host that stops a stream partway through.
    pub fn schedule_command(&mut self, after_sends: usize, command: Command) {
        self.scheduled.push((after_sends, command));
    }

    /// All frames sent so far, in order.
    pub fn sent(&self) -> &[SentFrame] {
        &self.sent
    }

    /// Concatenation of every sent frame's body bytes.
    pub fn sent_body(&self) -> Vec<u8> {
        self.sent
            .iter()
            .flat_map(|s| s.frame.body.iter().copied())
            .collect()
    }

    /// Whether a command of the given kind is still queued.
    pub fn has_command(&self, kind: CommandKind) -> bool {
        self.commands.contains(kind)
    }
}

impl Transport for MemoryTransport {
    fn wait_frame(&mut self) -> RelayResult<Option<InboundFrame>> {
        Ok(self.inbound.pop_front())
    }

    fn send_frame(&mut self, frame: Frame, codec: Codec) -> RelayResult<()> {
        self.sent.push(SentFrame { frame, codec });
        let sent = self.sent.len();
        let mut due = Vec::new();
        self.scheduled.retain(|(after, command)| {
            if *after == sent {
                due.push(*command);
                false
            } else {
                true
            }
        });
        for command in due {
            self.commands.push(command);
        }
        Ok(())
    }

    fn poll_command(&mut self, kind: CommandKind) -> Option<Command> {
        self.commands.take(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_frame_drains_then_signals_termination() {
        let mut transport = MemoryTransport::new();
        transport.push_inbound("head", "body");

        let frame = transport.wait_frame().unwrap().unwrap();
        assert_eq!(frame.body, Bytes::from("body"));
        assert!(transport.wait_frame().unwrap().is_none());
    }

    #[test]
    fn sent_body_concatenates_frames() {
        let mut transport = MemoryTransport::new();
        transport.send_frame(Frame::new("Hel", None, false), Codec::Json).unwrap();
        transport.send_frame(Frame::new("lo", None, true), Codec::Json).unwrap();

        assert_eq!(transport.sent_body(), b"Hello");
        assert_eq!(transport.sent().len(), 2);
    }

    #[test]
    fn poll_command_consumes_queued_command() {
        let mut transport = MemoryTransport::new();
        transport.push_command(Command::StreamStop);

        assert!(transport.poll_command(CommandKind::StreamStop).is_some());
        assert!(transport.poll_command(CommandKind::StreamStop).is_none());
    }

    #[test]
    fn scheduled_command_appears_after_nth_send() {
        let mut transport = MemoryTransport::new();
        transport.schedule_command(2, Command::StreamStop);

        transport.send_frame(Frame::new("a", None, false), Codec::Json).unwrap();
        assert!(!transport.has_command(CommandKind::StreamStop));

        transport.send_frame(Frame::new("b", None, false), Codec::Json).unwrap();
        assert!(transport.has_command(CommandKind::StreamStop));
    }
}
