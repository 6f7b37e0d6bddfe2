use crate::ports::ResponseWriter;
use dns_bridge_domain::DomainError;
use hickory_proto::op::Message;
use std::net::IpAddr;

/// In-memory [`ResponseWriter`] that records the engine's answer instead of
/// writing it to a socket. One capture serves exactly one call.
#[derive(Debug)]
pub struct ResponseCapture {
    local_addr: IpAddr,
    remote_addr: IpAddr,
    message: Option<Message>,
}

impl ResponseCapture {
    pub fn new(local_addr: IpAddr, remote_addr: IpAddr) -> Self {
        Self {
            local_addr,
            remote_addr,
            message: None,
        }
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn into_message(self) -> Option<Message> {
        self.message
    }
}

impl ResponseWriter for ResponseCapture {
    fn local_addr(&self) -> IpAddr {
        self.local_addr
    }

    fn remote_addr(&self) -> IpAddr {
        self.remote_addr
    }

    fn write_msg(&mut self, message: Message) -> Result<(), DomainError> {
        self.message = Some(message);
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, DomainError> {
        let message =
            Message::from_vec(bytes).map_err(|e| DomainError::MalformedResponse(e.to_string()))?;
        self.message = Some(message);
        Ok(bytes.len())
    }

    fn close(&mut self) -> Result<(), DomainError> {
        Ok(())
    }

    fn tsig_status(&self) -> Result<(), DomainError> {
        Ok(())
    }

    fn tsig_timers_only(&mut self, _timers_only: bool) {}

    fn hijack(&mut self) {}
}
