//! Binding to libalpino_corpus
//!
//! Serves Dact (DBXML) and compact corpora through the C API of the
//! alpinocorpus library. Strings returned by the library are owned by the
//! caller: each one is copied into a Rust `String` and then released with
//! `free`.

use crate::engine::{Backend, Corpus, Cursor};
use libc::{c_char, c_int, c_void};
use std::cell::Cell;
use std::ffi::{CStr, CString};
use std::path::Path;
use std::ptr::NonNull;
use tracing::{debug, trace};

#[allow(non_camel_case_types)]
#[repr(C)]
struct alpinocorpus_reader_t {
    _private: [u8; 0],
}

#[allow(non_camel_case_types)]
#[repr(C)]
struct alpinocorpus_iter_t {
    _private: [u8; 0],
}

#[link(name = "alpino_corpus")]
unsafe extern "C" {
    fn alpinocorpus_open(path: *const c_char) -> *mut alpinocorpus_reader_t;
    fn alpinocorpus_close(reader: *mut alpinocorpus_reader_t);
    fn alpinocorpus_read(reader: *mut alpinocorpus_reader_t, entry: *const c_char) -> *mut c_char;
    fn alpinocorpus_entry_iter(reader: *mut alpinocorpus_reader_t) -> *mut alpinocorpus_iter_t;
    fn alpinocorpus_query_iter(
        reader: *mut alpinocorpus_reader_t,
        query: *const c_char,
    ) -> *mut alpinocorpus_iter_t;
    fn alpinocorpus_iter_next(
        reader: *mut alpinocorpus_reader_t,
        iter: *mut alpinocorpus_iter_t,
    ) -> c_int;
    fn alpinocorpus_iter_value(iter: *mut alpinocorpus_iter_t) -> *mut c_char;
    fn alpinocorpus_iter_destroy(iter: *mut alpinocorpus_iter_t);
    fn alpinocorpus_is_valid_query(reader: *mut alpinocorpus_reader_t, query: *const c_char)
    -> c_int;
}

/// Copy a library-owned C string and free the original
///
/// # Safety
/// `ptr` must be null or a NUL-terminated string allocated with `malloc`
/// that nothing else will free.
unsafe fn take_string(ptr: *mut c_char) -> Option<String> {
    let ptr = NonNull::new(ptr)?;
    let value = unsafe { CStr::from_ptr(ptr.as_ptr()) }
        .to_string_lossy()
        .into_owned();
    unsafe { libc::free(ptr.as_ptr() as *mut c_void) };
    Some(value)
}

/// Engine backed by libalpino_corpus
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl Backend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn open_corpus(&self, path: &Path) -> Option<Box<dyn Corpus>> {
        let c_path = CString::new(path.to_str()?).ok()?;
        let handle = NonNull::new(unsafe { alpinocorpus_open(c_path.as_ptr()) })?;
        debug!(path = %path.display(), "libalpino_corpus opened corpus");
        Some(Box::new(NativeCorpus { handle }))
    }
}

struct NativeCorpus {
    handle: NonNull<alpinocorpus_reader_t>,
}

impl NativeCorpus {
    fn cursor(&self, iter: *mut alpinocorpus_iter_t) -> Option<Box<dyn Cursor + '_>> {
        let iter = NonNull::new(iter)?;
        Some(Box::new(NativeCursor {
            corpus: self,
            iter,
            exhausted: Cell::new(false),
        }))
    }
}

impl Corpus for NativeCorpus {
    fn backend(&self) -> &'static str {
        "native"
    }

    fn read_entry(&self, name: &str) -> Option<String> {
        let c_name = CString::new(name).ok()?;
        unsafe { take_string(alpinocorpus_read(self.handle.as_ptr(), c_name.as_ptr())) }
    }

    fn entry_iter(&self) -> Option<Box<dyn Cursor + '_>> {
        self.cursor(unsafe { alpinocorpus_entry_iter(self.handle.as_ptr()) })
    }

    fn query_iter(&self, query: &str) -> Option<Box<dyn Cursor + '_>> {
        let c_query = CString::new(query).ok()?;
        self.cursor(unsafe { alpinocorpus_query_iter(self.handle.as_ptr(), c_query.as_ptr()) })
    }

    fn is_valid_query(&self, query: &str) -> bool {
        let Ok(c_query) = CString::new(query) else {
            return false;
        };
        unsafe { alpinocorpus_is_valid_query(self.handle.as_ptr(), c_query.as_ptr()) == 1 }
    }
}

impl Drop for NativeCorpus {
    fn drop(&mut self) {
        unsafe { alpinocorpus_close(self.handle.as_ptr()) };
    }
}

struct NativeCursor<'c> {
    corpus: &'c NativeCorpus,
    iter: NonNull<alpinocorpus_iter_t>,
    exhausted: Cell<bool>,
}

impl Cursor for NativeCursor<'_> {
    fn value(&self) -> Option<String> {
        if self.exhausted.get() {
            return None;
        }
        let value = unsafe { take_string(alpinocorpus_iter_value(self.iter.as_ptr())) };
        // A null value means the library has nothing under the cursor.
        if value.is_none() {
            self.exhausted.set(true);
        }
        value
    }

    fn advance(&mut self) -> bool {
        if self.exhausted.get() {
            return false;
        }
        let more =
            unsafe { alpinocorpus_iter_next(self.corpus.handle.as_ptr(), self.iter.as_ptr()) } != 0;
        self.exhausted.set(!more);
        more
    }
}

impl Drop for NativeCursor<'_> {
    fn drop(&mut self) {
        unsafe { alpinocorpus_iter_destroy(self.iter.as_ptr()) };
        trace!("libalpino_corpus iterator destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_string_null() {
        assert_eq!(unsafe { take_string(std::ptr::null_mut()) }, None);
    }

    #[test]
    fn test_take_string_frees_copy() {
        let ptr = unsafe { libc::strdup(c"cdb/1.xml".as_ptr()) };
        assert_eq!(unsafe { take_string(ptr) }.as_deref(), Some("cdb/1.xml"));
    }

    #[test]
    fn test_open_missing_corpus() {
        assert!(
            NativeBackend
                .open_corpus(Path::new("/nonexistent/corpus.dact"))
                .is_none()
        );
    }
}
