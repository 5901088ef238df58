use crate::abi::Status ;



/// What a completed protocol call produced.
///
/// Protocol violations are not outcomes; they are reported as
/// [`DispatchError::ProtocolViolation`]( super::DispatchError::ProtocolViolation ).
#[derive( Debug )]
pub enum CallOutcome {
	/// Status `0`; the payload is the function's result.
	Success( Vec<u8> ),
	/// Non-zero status with a payload, which is the guest's diagnostic.
	Failure( Vec<u8> ),
	/// Non-zero status without a payload, typically because the guest couldn't
	/// allocate. Nothing else is known about what went wrong.
	NoPayload { status: Status },
	/// The guest trapped (panic, `unreachable`, fuel or epoch exhaustion).
	/// Whatever it may have sent is discarded.
	Aborted( wasmtime::Error ),
}

impl CallOutcome {

	pub fn is_success( &self ) -> bool { matches!( self, Self::Success( _ )) }

	/// The payload of a success or failure.
	pub fn payload( &self ) -> Option<&[u8]> {
		match self {
			Self::Success( payload ) | Self::Failure( payload ) => Some( payload ),
			Self::NoPayload { .. } | Self::Aborted( _ ) => None,
		}
	}

	/// The payload as text, replacing invalid UTF-8.
	pub fn payload_lossy( &self ) -> Option<std::borrow::Cow<'_, str>> {
		self.payload().map( String::from_utf8_lossy )
	}

}

/// Bookkeeping for the most recent call, kept for diagnostics.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct CallRecord {
	pub function: String,
	/// Summed argument lengths passed to the export.
	pub declared_len: usize,
	/// Bytes written by `write_args_to_buffer`; `None` if the guest never asked.
	pub args_written: Option<usize>,
	pub results_sent: u32,
	/// Raw status; `None` when the call aborted or was rejected before returning.
	pub status: Option<Status>,
}
