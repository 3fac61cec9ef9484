//! In-memory encoder with a configurable quality -> size curve.

use std::cell::RefCell;
use std::fs;

use jpegfit::error::EncodeError;
use jpegfit::services::{EncodeFlags, Encoder, RawPixelFile};

/// One recorded `encode` call.
#[derive(Debug, Clone)]
pub struct EncodeCall {
    pub quality: u8,
    pub flags: EncodeFlags,
    /// The staged PPM exactly as the encoder would have read it.
    pub ppm: Vec<u8>,
}

/// Returns `curve(quality)` bytes of filler and records every call.
pub struct StubEncoder {
    curve: Box<dyn Fn(u8) -> usize>,
    fail: bool,
    after_encode: Box<dyn Fn(usize)>,
    calls: RefCell<Vec<EncodeCall>>,
}

impl StubEncoder {
    pub fn with_curve(curve: impl Fn(u8) -> usize + 'static) -> Self {
        Self {
            curve: Box::new(curve),
            fail: false,
            after_encode: Box::new(|_| {}),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Size grows linearly with quality: `quality * 1000` bytes.
    pub fn linear() -> Self {
        Self::with_curve(|q| q as usize * 1000)
    }

    /// Every call fails with a non-zero exit.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::linear()
        }
    }

    /// Run `hook` with the running call count after each encode.
    pub fn on_encode(mut self, hook: impl Fn(usize) + 'static) -> Self {
        self.after_encode = Box::new(hook);
        self
    }

    pub fn calls(&self) -> Vec<EncodeCall> {
        self.calls.borrow().clone()
    }

    pub fn qualities(&self) -> Vec<u8> {
        self.calls.borrow().iter().map(|c| c.quality).collect()
    }
}

impl Encoder for StubEncoder {
    fn encode(
        &self,
        raw: &RawPixelFile,
        quality: u8,
        flags: EncodeFlags,
    ) -> Result<Vec<u8>, EncodeError> {
        let ppm = fs::read(raw.path())?;
        let count = {
            let mut calls = self.calls.borrow_mut();
            calls.push(EncodeCall {
                quality,
                flags,
                ppm,
            });
            calls.len()
        };
        (self.after_encode)(count);

        if self.fail {
            return Err(EncodeError::Failed {
                status: "exit status: 1".to_string(),
                stderr: "stub failure".to_string(),
            });
        }
        Ok(vec![0xA5; (self.curve)(quality)])
    }
}
