//! Fastchannel integration monitor: view-state controller for the admin
//! screen, the RPC paths it uses to reach the ERP service layer, and a text
//! renderer for the resulting view.

pub mod config;
pub mod fastchannel_client;
pub mod monitor;
pub mod render;
pub mod types;
