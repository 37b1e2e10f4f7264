pub mod cmdline;
pub mod configure;
pub mod firewall;
pub mod listener;
pub mod loopback;
pub mod probe;
pub mod serve;

#[cfg(test)]
pub(crate) mod testutil;
