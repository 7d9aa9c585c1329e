//! # qirust-fast
//!
//! A thread-safe QR code encoder that reuses expensive per-version work.
//!
//! `qirust-fast` encodes text or binary data into QR codes following the QR Code Model 2
//! standard: versions 1 to 40, four error correction levels, and numeric, alphanumeric, byte
//! and ECI segments. The function patterns, mask grids and data placement order of each
//! version, as well as the Reed-Solomon tables of each degree, are computed once and shared
//! by every symbol that needs them, across threads.
//!
//! ## Features
//!
//! - Encode data in numeric, alphanumeric, byte, or ECI modes.
//! - Support four error correction levels: Low, Medium, Quartile, High.
//! - Automatic version, mask and error correction boost, or fixed choices via [`EncodeOptions`].
//! - Render QR codes as SVG, console text, in-memory image buffers, or dotted SVG.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qirust-fast = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! ```rust
//! use qirust_fast::qrcode::{QrCode, QrCodeEcc};
//!
//! let qr = QrCode::encode_text("HELLO WORLD", QrCodeEcc::Medium).unwrap();
//! assert_eq!(qr.size(), 21);
//! let dark = qr.get_module(0, 0);
//! assert!(dark);
//! ```
//!
//! Generate an in-memory image buffer:
//!
//! ```rust
//! use qirust_fast::helper::generate_image_buffer;
//!
//! let img = generate_image_buffer("Hello, World!", None).unwrap();
//! assert_eq!(img.width(), 29);
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Core QR code encoding functionality.
//! - [`segment`]: Data segments and their bit encodings.
//! - [`options`]: Encoding parameters.
//! - [`helper`]: Utilities for rendering QR codes in various formats.
//! - [`memoizer`]: The shared compute-once cache behind the per-version and per-degree tables.

#![forbid(unsafe_code)]

pub mod bitbuffer;
pub mod error;
pub mod grid;
pub mod helper;
pub mod memoizer;
pub mod options;
pub mod qrcode;
pub mod reedsolomon;
pub mod segment;
pub mod template;

pub use error::{DataTooLong, QrError};
pub use options::EncodeOptions;
pub use qrcode::{Mask, QrCode, QrCodeEcc, Version};
pub use segment::{QrSegment, QrSegmentMode};
