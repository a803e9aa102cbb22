// Library root
// -----------
// This crate exposes the library surface used by the `panel-fm` binary.
//
// Module responsibilities:
// - `api`: HTTP client for the control panel's file manager (mkdir,
//   upload, delete file, delete directory).
// - `response`: decoding of the panel's two response envelopes into one
//   verdict.
// - `remote`: the `RemoteFs` trait the client implements.
// - `path`: absolute vs home-relative remote paths.
// - `config`: settings file + environment loading.
// - `demo`: the scripted demonstration sequence.
// - `scratch`: temporary local work area.
// - `ui`: terminal progress around remote calls.
//
// The demo only talks to `RemoteFs`, so it can run against a fake in tests.
pub mod api;
pub mod config;
pub mod demo;
pub mod error;
pub mod logging;
pub mod path;
pub mod remote;
pub mod response;
pub mod scratch;
pub mod ui;

pub use api::FileManagerClient;
pub use error::{ErrorCategory, FmError};
pub use remote::RemoteFs;
