use std::collections::TryReserveError ;
use std::fmt::Display ;

use crate::abi::Status ;



/// The buffer handed to `send_result_to_host`.
///
/// Always owned by the guest and never shared with the argument buffer: values
/// borrowed from the arguments are copied into a fresh allocation first.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct ResultBuffer {
	bytes: Vec<u8>,
}

impl ResultBuffer {

	/// Copies `bytes` into a newly acquired buffer.
	///
	/// # Errors
	/// Returns an error if the allocation fails.
	pub fn copy_from( bytes: &[u8] ) -> Result<Self, TryReserveError> {
		let mut owned = Vec::new();
		owned.try_reserve_exact( bytes.len() )?;
		owned.extend_from_slice( bytes );
		Ok( Self { bytes: owned })
	}

	#[inline] pub fn as_slice( &self ) -> &[u8] { &self.bytes }

	#[inline] pub fn len( &self ) -> usize { self.bytes.len() }

	#[inline] pub fn is_empty( &self ) -> bool { self.bytes.is_empty() }

	#[inline] pub fn into_vec( self ) -> Vec<u8> { self.bytes }

}

impl From<Vec<u8>> for ResultBuffer {
	#[inline] fn from( bytes: Vec<u8> ) -> Self { Self { bytes }}
}

/// Types an exported function may return as its success payload.
pub trait IntoResultBuffer {
	/// # Errors
	/// Returns an error if a copy was needed and its allocation failed.
	fn into_result_buffer( self ) -> Result<ResultBuffer, TryReserveError> ;
}

impl IntoResultBuffer for Vec<u8> {
	fn into_result_buffer( self ) -> Result<ResultBuffer, TryReserveError> { Ok( self.into() ) }
}

impl IntoResultBuffer for Box<[u8]> {
	fn into_result_buffer( self ) -> Result<ResultBuffer, TryReserveError> { Ok( self.into_vec().into() ) }
}

impl IntoResultBuffer for String {
	fn into_result_buffer( self ) -> Result<ResultBuffer, TryReserveError> { Ok( self.into_bytes().into() ) }
}

impl IntoResultBuffer for &[u8] {
	fn into_result_buffer( self ) -> Result<ResultBuffer, TryReserveError> { ResultBuffer::copy_from( self ) }
}

impl IntoResultBuffer for &mut [u8] {
	fn into_result_buffer( self ) -> Result<ResultBuffer, TryReserveError> { ResultBuffer::copy_from( self ) }
}

impl IntoResultBuffer for &str {
	fn into_result_buffer( self ) -> Result<ResultBuffer, TryReserveError> { ResultBuffer::copy_from( self.as_bytes() ) }
}

/// Return types of exported functions.
///
/// A bare payload always succeeds; `Result<T, E>` reports `E`'s `Display` text
/// as the diagnostic.
pub trait IntoOutput {
	type Ok: IntoResultBuffer ;
	type Err: Display ;
	/// # Errors
	/// Returns the function's own error, if it reported one.
	fn into_output( self ) -> Result<Self::Ok, Self::Err> ;
}

macro_rules! infallible_output {
	( $( $ty:ty ),* $(,)? ) => { $(
		impl IntoOutput for $ty {
			type Ok = Self ;
			type Err = std::convert::Infallible ;
			fn into_output( self ) -> Result<Self::Ok, Self::Err> { Ok( self ) }
		}
	)* };
}

infallible_output!( Vec<u8>, Box<[u8]>, String, &[u8], &mut [u8], &str );

impl<T: IntoResultBuffer, E: Display> IntoOutput for Result<T, E> {
	type Ok = T ;
	type Err = E ;
	fn into_output( self ) -> Self { self }
}

/// What an exported function hands back: a payload (or diagnostic) and the
/// status to return once it has been sent.
///
/// Owns its bytes, so it can outlive the argument buffer the function read from.
#[derive( Debug )]
pub struct Reply {
	buffer: Result<ResultBuffer, TryReserveError>,
	status: Status,
}

impl Reply {

	/// Converts a function's return value.
	pub fn new<R: IntoOutput>( value: R ) -> Self {
		match value.into_output() {
			Ok( payload ) => Self { buffer: payload.into_result_buffer(), status: Status::SUCCESS },
			Err( err ) => Self::failure( &err ),
		}
	}

	/// A failure whose diagnostic is `err`'s `Display` text.
	pub fn failure( err: &impl Display ) -> Self {
		Self { buffer: Ok( err.to_string().into_bytes().into() ), status: Status::FAILURE }
	}

	#[inline] pub fn status( &self ) -> Status { self.status }

	/// The bytes to send, or `None` if acquiring the result buffer failed.
	#[inline] pub fn payload( &self ) -> Option<&[u8]> { self.buffer.as_ref().ok().map( ResultBuffer::as_slice ) }

	pub(crate) fn into_parts( self ) -> ( Result<ResultBuffer, TryReserveError>, Status ) {
		( self.buffer, self.status )
	}

}
