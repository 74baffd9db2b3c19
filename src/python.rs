//! Python bindings for alpinocorpus
//!
//! This module provides PyO3-based Python bindings for readers and queries.

use pyo3::exceptions::{PyIOError, PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyWeakrefMethods, PyWeakrefReference};
use std::path::PathBuf;

use crate::error::CorpusError;
use crate::reader::Reader as RustReader;

/// Convert CorpusError to Python exception
impl From<CorpusError> for PyErr {
    fn from(err: CorpusError) -> PyErr {
        let message = err.to_string();
        match err {
            CorpusError::OpenFailed { .. } => PyIOError::new_err(message),
            CorpusError::ClosedReader { .. } => PyValueError::new_err(message),
            CorpusError::EntryNotFound { name } => PyKeyError::new_err(name),
            CorpusError::EntryIterationFailed | CorpusError::QueryExecutionFailed { .. } => {
                PyRuntimeError::new_err(message)
            }
        }
    }
}

/// An open Alpino corpus.
///
/// Supports Dact (DBXML) files, compact corpora and directories of XML
/// files. Use as a context manager to close the corpus deterministically.
///
/// Example:
///     >>> with Reader("cdb.dact") as reader:
///     ...     for name in reader:
///     ...         print(name, len(reader.read(name)))
#[pyclass(name = "Reader", unsendable, weakref)]
pub struct PyReader {
    inner: RustReader,
}

#[pymethods]
impl PyReader {
    /// Open the corpus at path.
    ///
    /// Raises:
    ///     IOError: If the path is missing, unreadable or not a corpus
    #[new]
    fn new(path: PathBuf) -> PyResult<Self> {
        Ok(PyReader {
            inner: RustReader::open(path)?,
        })
    }

    /// Release the corpus. Calling it again does nothing.
    fn close(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.close();
        slf
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    /// Call callback with every entry name, one at a time.
    ///
    /// An exception raised by the callback stops the traversal and is
    /// propagated after the corpus iterator has been released.
    fn each<'py>(
        slf: PyRef<'py, Self>,
        callback: &Bound<'py, PyAny>,
    ) -> PyResult<PyRef<'py, Self>> {
        for name in slf.inner.entries()? {
            callback.call1((name,))?;
        }
        Ok(slf)
    }

    /// List of all entry names.
    ///
    /// The whole list is built before returning; use each() to visit
    /// entries one at a time without holding them all.
    fn entries(&self) -> PyResult<Vec<String>> {
        Ok(self.inner.entries()?.collect())
    }

    /// Content of one entry.
    ///
    /// Raises:
    ///     KeyError: If the corpus has no such entry
    fn read(&self, name: &str) -> PyResult<String> {
        Ok(self.inner.read(name)?)
    }

    /// Bind a query to this reader. The query is not validated.
    fn query(slf: &Bound<'_, Self>, query: String) -> PyResult<PyQuery> {
        let reader = PyWeakrefReference::new(slf.as_any())?.unbind();
        Ok(PyQuery {
            reader,
            text: query,
        })
    }

    fn valid_query(&self, query: &str) -> PyResult<bool> {
        Ok(self.inner.valid_query(query)?)
    }

    /// Iterate over entry names.
    ///
    /// Names are collected up front, so the corpus iterator is already
    /// released when the first name is returned. Use each() for a lazy
    /// traversal.
    fn __iter__(&self) -> PyResult<PyEntryIterator> {
        Ok(PyEntryIterator {
            inner: self.inner.entries()?.collect::<Vec<_>>().into_iter(),
        })
    }

    fn __enter__(slf: PyRef<'_, Self>) -> PyRef<'_, Self> {
        slf
    }

    fn __exit__(
        &mut self,
        _exc_type: &Bound<'_, PyAny>,
        _exc_value: &Bound<'_, PyAny>,
        _traceback: &Bound<'_, PyAny>,
    ) -> bool {
        self.inner.close();
        false
    }

    fn __repr__(&self) -> String {
        let state = if self.inner.is_open() { "open" } else { "closed" };
        format!("<Reader path='{}' {}>", self.inner.path().display(), state)
    }
}

/// A query bound to a Reader.
///
/// Each call to each() or entries() runs the query again. The query only
/// holds a weak reference to its reader.
#[pyclass(name = "Query", unsendable)]
pub struct PyQuery {
    reader: Py<PyWeakrefReference>,
    text: String,
}

impl PyQuery {
    fn reader<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyReader>> {
        self.reader
            .bind(py)
            .upgrade_as::<PyReader>()?
            .ok_or_else(|| PyValueError::new_err("Reader no longer exists"))
    }
}

#[pymethods]
impl PyQuery {
    #[getter]
    fn text(&self) -> &str {
        &self.text
    }

    /// Call callback with every matching entry name, one at a time.
    fn each<'py>(
        slf: PyRef<'py, Self>,
        callback: &Bound<'py, PyAny>,
    ) -> PyResult<PyRef<'py, Self>> {
        let reader = slf.reader(slf.py())?;
        {
            let reader = reader.borrow();
            let query = reader.inner.query(slf.text.as_str());
            for name in query.entries()? {
                callback.call1((name,))?;
            }
        }
        Ok(slf)
    }

    /// List of matching entry names, built in full before returning.
    fn entries(&self, py: Python<'_>) -> PyResult<Vec<String>> {
        let reader = self.reader(py)?;
        let reader = reader.borrow();
        let names = reader.inner.query(self.text.as_str()).entries()?.collect();
        Ok(names)
    }

    fn is_valid(&self, py: Python<'_>) -> PyResult<bool> {
        let reader = self.reader(py)?;
        let reader = reader.borrow();
        Ok(reader.inner.valid_query(&self.text)?)
    }

    /// Iterate over matching names, collected up front like Reader.__iter__.
    fn __iter__(&self, py: Python<'_>) -> PyResult<PyEntryIterator> {
        Ok(PyEntryIterator {
            inner: self.entries(py)?.into_iter(),
        })
    }

    fn __repr__(&self) -> String {
        format!("<Query '{}'>", self.text)
    }
}

/// Iterator over entry names that were already collected from the corpus.
#[pyclass(name = "EntryIterator", unsendable)]
pub struct PyEntryIterator {
    inner: std::vec::IntoIter<String>,
}

#[pymethods]
impl PyEntryIterator {
    fn __iter__(slf: PyRef<Self>) -> PyRef<Self> {
        slf
    }

    fn __next__(&mut self) -> Option<String> {
        self.inner.next()
    }
}

#[pyfunction]
fn __version__() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn alpinocorpus(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyReader>()?;
    m.add_class::<PyQuery>()?;
    m.add_class::<PyEntryIterator>()?;

    m.add_function(wrap_pyfunction!(__version__, m)?)?;

    Ok(())
}
