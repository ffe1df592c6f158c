use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use std::os::windows::io::{AsRawHandle, FromRawHandle, OwnedHandle};
use std::ptr;

use bytes::BytesMut;
use tracing::{debug, trace};
use windows_sys::Win32::Foundation::{
    GetLastError, ERROR_BROKEN_PIPE, ERROR_INVALID_HANDLE, ERROR_MORE_DATA, GENERIC_READ,
    GENERIC_WRITE, HANDLE, INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::Storage::FileSystem::{CreateFileW, ReadFile, WriteFile, OPEN_EXISTING};
use windows_sys::Win32::System::Pipes::{SetNamedPipeHandleState, PIPE_READMODE_MESSAGE};

use crate::error::{OsErrorCode, Result, TransportError};
use crate::traits::{RawPipe, ReadOutcome};

/// Client end of a Windows named pipe in message read mode.
#[derive(Debug)]
pub struct NamedPipe {
    handle: Option<OwnedHandle>,
}

impl NamedPipe {
    /// Open an existing pipe for duplex, unshared access and switch it to
    /// message read mode.
    pub fn open(path: &str) -> Result<Self> {
        let wide: Vec<u16> = OsStr::new(path)
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        // SAFETY: `wide` is a nul-terminated UTF-16 string that outlives the call;
        // null security attributes and template handle are permitted.
        let raw = unsafe {
            CreateFileW(
                wide.as_ptr(),
                GENERIC_READ | GENERIC_WRITE,
                0,
                ptr::null(),
                OPEN_EXISTING,
                0,
                ptr::null_mut(),
            )
        };
        if raw == INVALID_HANDLE_VALUE {
            // SAFETY: reads thread-local error state set by the failed call above.
            let code = unsafe { GetLastError() };
            return Err(TransportError::ConnectFailed {
                path: path.to_string(),
                code,
            });
        }

        // SAFETY: `raw` is a valid handle freshly returned by CreateFileW and not
        // owned by anything else.
        let pipe = Self {
            handle: Some(unsafe { OwnedHandle::from_raw_handle(raw) }),
        };

        let mode = PIPE_READMODE_MESSAGE;
        // SAFETY: the handle is open; `mode` lives across the call and the
        // optional collection parameters are null.
        let ok = unsafe {
            SetNamedPipeHandleState(pipe.raw(), &mode, ptr::null(), ptr::null())
        };
        if ok == 0 {
            // SAFETY: as above.
            let code = unsafe { GetLastError() };
            // Dropping `pipe` releases the half-configured handle.
            return Err(TransportError::ModeSetFailed {
                path: path.to_string(),
                code,
            });
        }

        debug!(path, "opened named pipe in message mode");
        Ok(pipe)
    }

    fn raw(&self) -> HANDLE {
        match &self.handle {
            Some(handle) => handle.as_raw_handle(),
            None => INVALID_HANDLE_VALUE,
        }
    }
}

impl RawPipe for NamedPipe {
    fn read_chunk(&mut self, buf_size: usize) -> ReadOutcome {
        if self.handle.is_none() {
            return ReadOutcome::Closed;
        }

        let mut buf = BytesMut::zeroed(buf_size);
        let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        let mut read: u32 = 0;
        // SAFETY: `buf` has at least `len` writable bytes and `read` is a valid
        // out-pointer; the handle was opened without FILE_FLAG_OVERLAPPED.
        let ok = unsafe { ReadFile(self.raw(), buf.as_mut_ptr(), len, &mut read, ptr::null_mut()) };
        let code = if ok == 0 {
            // SAFETY: reads thread-local error state set by the failed call above.
            unsafe { GetLastError() }
        } else {
            0
        };

        buf.truncate(read as usize);
        trace!(read, code, "ReadFile");
        match code {
            0 => ReadOutcome::Chunk(buf.freeze()),
            ERROR_MORE_DATA => ReadOutcome::ChunkContinues(buf.freeze()),
            ERROR_BROKEN_PIPE => ReadOutcome::Closed,
            other => ReadOutcome::TransientError(other),
        }
    }

    fn write_message(&mut self, buf: &[u8]) -> std::result::Result<usize, OsErrorCode> {
        if self.handle.is_none() {
            return Err(ERROR_INVALID_HANDLE);
        }

        let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        let mut written: u32 = 0;
        // SAFETY: `buf` is valid for `len` bytes and `written` is a valid out-pointer.
        let ok = unsafe { WriteFile(self.raw(), buf.as_ptr(), len, &mut written, ptr::null_mut()) };
        if ok == 0 {
            // SAFETY: reads thread-local error state set by the failed call above.
            return Err(unsafe { GetLastError() });
        }
        trace!(written, "WriteFile");
        Ok(written as usize)
    }

    fn close(&mut self) {
        // OwnedHandle calls CloseHandle on drop.
        if self.handle.take().is_some() {
            debug!("closed named pipe handle");
        }
    }
}
