//! C ABI for linking qrbeam-core as a static library from a native scanner app or other C hosts.
//! Handles are not thread-safe; the host serializes calls per handle.

use std::ffi::c_void;
use std::os::raw::c_int;
use std::slice;

use crate::config::{ReceiverConfig, DEFAULT_MAX_FILE_LENGTH};
use crate::error::{BlockError, ReceiveError};
use crate::receiver::{Event, Receiver};

/// Payload accepted but nothing visible changed (duplicate or re-announced metadata).
pub const QRBEAM_OK: c_int = 0;
pub const QRBEAM_SESSION_OPENED: c_int = 1;
pub const QRBEAM_PROGRESS: c_int = 2;
pub const QRBEAM_COMPLETE: c_int = 3;
pub const QRBEAM_ERR_ARGS: c_int = -1;
pub const QRBEAM_ERR_TRUNCATED: c_int = -2;
pub const QRBEAM_ERR_METADATA: c_int = -3;
pub const QRBEAM_ERR_OUT_OF_BOUNDS: c_int = -4;
pub const QRBEAM_ERR_NO_SESSION: c_int = -5;

/// Create a receiver. `max_file_length` 0 selects the default limit. Returns opaque handle.
#[no_mangle]
pub extern "C" fn qrbeam_receiver_create(max_file_length: u64) -> *mut c_void {
    let limit = if max_file_length == 0 {
        DEFAULT_MAX_FILE_LENGTH
    } else {
        max_file_length
    };
    let rx = Receiver::new(ReceiverConfig::with_max_file_length(limit));
    Box::into_raw(Box::new(rx)) as *mut c_void
}

/// Destroy receiver. No-op if h is null.
#[no_mangle]
pub extern "C" fn qrbeam_receiver_destroy(h: *mut c_void) {
    if h.is_null() {
        return;
    }
    let _ = unsafe { Box::from_raw(h as *mut Receiver) };
}

/// Feed one decoded payload. Returns the most significant event (QRBEAM_COMPLETE >
/// QRBEAM_SESSION_OPENED > QRBEAM_PROGRESS > QRBEAM_OK) or a negative QRBEAM_ERR_* code.
#[no_mangle]
pub extern "C" fn qrbeam_receiver_push(h: *mut c_void, bytes: *const u8, len: usize) -> c_int {
    if h.is_null() || (bytes.is_null() && len > 0) {
        return QRBEAM_ERR_ARGS;
    }
    let rx = unsafe { &mut *(h as *mut Receiver) };
    let raw: &[u8] = if len == 0 {
        &[]
    } else {
        unsafe { slice::from_raw_parts(bytes, len) }
    };
    match rx.on_payload(raw) {
        Ok(events) => status_for(&events),
        Err(e) => error_code(&e),
    }
}

fn status_for(events: &[Event]) -> c_int {
    events
        .iter()
        .map(|e| match e {
            Event::Complete { .. } => QRBEAM_COMPLETE,
            Event::SessionOpened { .. } => QRBEAM_SESSION_OPENED,
            Event::Progress(_) => QRBEAM_PROGRESS,
        })
        .max()
        .unwrap_or(QRBEAM_OK)
}

fn error_code(e: &ReceiveError) -> c_int {
    match e {
        ReceiveError::Block(BlockError::Truncated { .. }) => QRBEAM_ERR_TRUNCATED,
        ReceiveError::Block(_) => QRBEAM_ERR_OUT_OF_BOUNDS,
        ReceiveError::Metadata(_) => QRBEAM_ERR_METADATA,
        ReceiveError::NoActiveSession { .. } => QRBEAM_ERR_NO_SESSION,
    }
}

/// Discard the active session. Returns 1 if one was discarded, 0 if none, -1 if h null.
#[no_mangle]
pub extern "C" fn qrbeam_receiver_reset(h: *mut c_void) -> c_int {
    if h.is_null() {
        return QRBEAM_ERR_ARGS;
    }
    let rx = unsafe { &mut *(h as *mut Receiver) };
    rx.reset() as c_int
}

/// Fill received/total block counts. Returns 1 if complete, 0 if in progress, -5 with no session.
#[no_mangle]
pub extern "C" fn qrbeam_receiver_progress(
    h: *mut c_void,
    out_received: *mut u32,
    out_total: *mut u32,
) -> c_int {
    if h.is_null() || out_received.is_null() || out_total.is_null() {
        return QRBEAM_ERR_ARGS;
    }
    let rx = unsafe { &*(h as *const Receiver) };
    let Some(p) = rx.progress() else {
        return QRBEAM_ERR_NO_SESSION;
    };
    unsafe {
        *out_received = p.received_count;
        *out_total = p.total_count;
    }
    rx.is_complete() as c_int
}

/// Declared file length of the active session, or -1 with no session.
#[no_mangle]
pub extern "C" fn qrbeam_receiver_file_length(h: *mut c_void) -> i64 {
    if h.is_null() {
        return -1;
    }
    let rx = unsafe { &*(h as *const Receiver) };
    rx.session()
        .map(|s| s.metadata().file_length as i64)
        .unwrap_or(-1)
}

/// Copy the UTF-8 file name (not NUL-terminated). Returns bytes written, or negative on error.
#[no_mangle]
pub extern "C" fn qrbeam_receiver_file_name(
    h: *mut c_void,
    out_buf: *mut u8,
    out_buf_len: usize,
) -> c_int {
    if h.is_null() || out_buf.is_null() {
        return QRBEAM_ERR_ARGS;
    }
    let rx = unsafe { &*(h as *const Receiver) };
    let Some(session) = rx.session() else {
        return QRBEAM_ERR_NO_SESSION;
    };
    copy_out(session.file_name().as_bytes(), out_buf, out_buf_len)
}

/// Copy the session buffer (complete or not). Returns bytes written, or negative on error.
#[no_mangle]
pub extern "C" fn qrbeam_receiver_copy_file(
    h: *mut c_void,
    out_buf: *mut u8,
    out_buf_len: usize,
) -> c_int {
    if h.is_null() || (out_buf.is_null() && out_buf_len > 0) {
        return QRBEAM_ERR_ARGS;
    }
    let rx = unsafe { &*(h as *const Receiver) };
    let Some(session) = rx.session() else {
        return QRBEAM_ERR_NO_SESSION;
    };
    copy_out(session.buffer(), out_buf, out_buf_len)
}

fn copy_out(src: &[u8], out_buf: *mut u8, out_buf_len: usize) -> c_int {
    if src.len() > out_buf_len || src.len() > c_int::MAX as usize {
        return QRBEAM_ERR_ARGS;
    }
    if !src.is_empty() {
        unsafe {
            out_buf.copy_from_nonoverlapping(src.as_ptr(), src.len());
        }
    }
    src.len() as c_int
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::metadata::TransferMetadata;

    fn push(h: *mut c_void, raw: &[u8]) -> c_int {
        qrbeam_receiver_push(h, raw.as_ptr(), raw.len())
    }

    #[test]
    fn push_reports_status_codes() {
        let h = qrbeam_receiver_create(0);
        let meta = TransferMetadata {
            file_name: "c.bin".into(),
            file_length: 4,
            block_size: 2,
            last_block_index: 2,
        };
        let b0 = Block::new(0, 0, meta.to_payload()).encode();
        let b1 = Block::new(1, 0, vec![1, 2]).encode();
        let b2 = Block::new(2, 2, vec![3, 4]).encode();

        assert_eq!(push(h, &b1), QRBEAM_ERR_NO_SESSION);
        assert_eq!(push(h, &b0), QRBEAM_SESSION_OPENED);
        assert_eq!(push(h, &b0), QRBEAM_OK);
        assert_eq!(push(h, &[0, 0, 0]), QRBEAM_ERR_TRUNCATED);
        assert_eq!(push(h, &Block::new(3, 0, vec![1]).encode()), QRBEAM_ERR_OUT_OF_BOUNDS);
        assert_eq!(push(h, &Block::new(0, 0, b"nope".to_vec()).encode()), QRBEAM_ERR_METADATA);
        assert_eq!(push(h, &b1), QRBEAM_PROGRESS);

        let (mut received, mut total) = (0u32, 0u32);
        assert_eq!(qrbeam_receiver_progress(h, &mut received, &mut total), 0);
        assert_eq!((received, total), (1, 2));

        assert_eq!(push(h, &b2), QRBEAM_COMPLETE);
        assert_eq!(qrbeam_receiver_file_length(h), 4);

        let mut name = [0u8; 16];
        let n = qrbeam_receiver_file_name(h, name.as_mut_ptr(), name.len());
        assert_eq!(&name[..n as usize], b"c.bin");

        let mut out = [0u8; 4];
        assert_eq!(qrbeam_receiver_copy_file(h, out.as_mut_ptr(), 3), QRBEAM_ERR_ARGS);
        assert_eq!(qrbeam_receiver_copy_file(h, out.as_mut_ptr(), out.len()), 4);
        assert_eq!(out, [1, 2, 3, 4]);

        assert_eq!(qrbeam_receiver_reset(h), 1);
        assert_eq!(qrbeam_receiver_file_length(h), -1);
        qrbeam_receiver_destroy(h);
    }

    #[test]
    fn null_handle_is_rejected() {
        assert_eq!(qrbeam_receiver_push(std::ptr::null_mut(), [0u8].as_ptr(), 1), QRBEAM_ERR_ARGS);
        assert_eq!(qrbeam_receiver_reset(std::ptr::null_mut()), QRBEAM_ERR_ARGS);
        qrbeam_receiver_destroy(std::ptr::null_mut());
    }
}
