use crate::ctx::RequestId;
use std::net::{IpAddr, Ipv4Addr};

/// Per-stream metadata shared by every filter invocation of one logical
/// request, including the invocation that runs after a stream replay.
#[derive(Debug, Clone)]
pub struct StreamInfo {
    /// Request ID assigned when the downstream request was accepted.
    request_id: RequestId,

    /// Remote IP of the downstream TCP connection (authoritative).
    pub peer_ip: IpAddr,

    /// Whether the downstream connection is TLS-protected.
    pub downstream_encrypted: bool,

    /// Response code as recorded for access logging. A status override on a
    /// replayed response rewrites this as well as the header.
    response_code: Option<u16>,

    /// Set once a local reply has been substituted for this request.
    local_reply_sent: bool,
}

impl Default for StreamInfo {
    fn default() -> Self {
        Self::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), false)
    }
}

impl StreamInfo {
    pub fn new(peer_ip: IpAddr, downstream_encrypted: bool) -> Self {
        Self {
            request_id: RequestId::default(),
            peer_ip,
            downstream_encrypted,
            response_code: None,
            local_reply_sent: false,
        }
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn response_code(&self) -> Option<u16> {
        self.response_code
    }

    pub fn set_response_code(&mut self, code: u16) {
        self.response_code = Some(code);
    }

    pub fn local_reply_sent(&self) -> bool {
        self.local_reply_sent
    }

    pub fn set_local_reply_sent(&mut self) {
        self.local_reply_sent = true;
    }
}
