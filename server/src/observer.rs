use std::net::SocketAddr;

/// Host-side record for a connected observer. The delivery address is
/// optional: an observer may be registered before its transport endpoint is
/// known.
#[derive(Clone)]
pub struct Observer {
    data_addr: Option<SocketAddr>,
}

impl Observer {
    pub fn new() -> Self {
        Self { data_addr: None }
    }

    pub fn has_address(&self) -> bool {
        self.data_addr.is_some()
    }

    pub fn address_opt(&self) -> Option<SocketAddr> {
        self.data_addr
    }

    pub fn set_address(&mut self, addr: &SocketAddr) {
        self.data_addr = Some(*addr);
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}
