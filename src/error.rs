//! Error types for decoding, slicing and serializing annotated volumes.

use std::io::Error as IOError;

quick_error! {
    /// The error taxonomy of this crate.
    ///
    /// Decode-time failures are all-or-nothing: either the whole header
    /// parses and the payload is accounted for, or the volume is rejected
    /// with one of the variants below. Per-pixel operations never fail;
    /// bounds are clamped or checked before indexing.
    #[derive(Debug)]
    pub enum NiftiError {
        /// The byte stream is not a NIfTI-1 volume, or its header fields
        /// are inconsistent (bad magic, bad `sizeof_hdr`, degenerate
        /// dimensions, `bitpix` disagreeing with the datatype).
        NotNifti {
            display("not a valid NIfTI-1 file")
        }
        /// The stream carries a detached-header magic (`ni1\0`); the voxel
        /// data lives in a separate `.img` file that was not provided.
        NoVolumeData {
            display("no volume data available (detached header file)")
        }
        /// The buffer ends before the data the header declares.
        Truncated {
            display("input ends before the declared voxel data")
        }
        /// The datatype code is not in the supported set.
        UnsupportedDataType(code: i16) {
            display("unsupported datatype code {}", code)
        }
        /// The gzip stream could not be inflated.
        CorruptCompression(err: IOError) {
            display("corrupt gzip stream: {}", err)
            source(err)
        }
        /// A requested coordinate lies outside the volume bounds.
        OutOfRange(what: &'static str, value: usize) {
            display("{} {} out of range", what, value)
        }
        /// I/O error from the optional file-path conveniences.
        Io(err: IOError) {
            from()
            source(err)
            display("I/O error: {}", err)
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = ::std::result::Result<T, NiftiError>;
