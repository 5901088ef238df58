use std::collections::TryReserveError ;
use pipe_trait::Pipe ;
use thiserror::Error ;



/// Errors raised while unpacking the argument buffer.
#[derive( Error, Debug, Clone, Copy, PartialEq, Eq )]
pub enum ArgError {
	/// The argument lengths do not fit in the address space when summed.
	#[error( "Argument lengths overflow the address space" )] Overflow,
	/// An argument asked for more bytes than are left in the buffer.
	#[error( "Argument of {requested} bytes requested but only {remaining} remain" )]
	Exhausted { requested: usize, remaining: usize },
}

/// Sums the argument lengths, `None` on overflow.
pub fn total_len( lengths: &[usize] ) -> Option<usize> {
	lengths.iter().try_fold( 0usize, |total, len | total.checked_add( *len ))
}

/// The single buffer the host writes all arguments of one call into.
///
/// Sized exactly to the sum of the argument lengths. The memory is released
/// when the buffer is dropped, whichever way the call ends.
#[derive( Debug )]
pub struct ArgBuffer {
	bytes: Vec<u8>,
}

impl ArgBuffer {

	/// Allocates a zeroed buffer of exactly `len` bytes.
	///
	/// # Errors
	/// Returns an error if the allocation fails. Nothing has been handed to the
	/// host at that point so the caller may simply report failure.
	pub fn acquire( len: usize ) -> Result<Self, TryReserveError> {
		let mut bytes = Vec::new();
		bytes.try_reserve_exact( len )?;
		bytes.resize( len, 0 );
		Ok( Self { bytes })
	}

	/// Sizes a buffer from an argument descriptor.
	///
	/// # Errors
	/// [`BufferError::Overflow`] if the lengths don't sum, [`BufferError::Alloc`]
	/// if the allocation fails.
	pub fn for_lengths( lengths: &[usize] ) -> Result<Self, BufferError> {
		total_len( lengths )
			.ok_or( BufferError::Overflow )?
			.pipe( Self::acquire )
			.map_err( BufferError::Alloc )
	}

	#[inline] pub fn len( &self ) -> usize { self.bytes.len() }

	#[inline] pub fn is_empty( &self ) -> bool { self.bytes.is_empty() }

	/// The region handed to `write_args_to_buffer`.
	#[inline] pub fn as_mut_slice( &mut self ) -> &mut [u8] { &mut self.bytes }

	#[inline] pub fn as_slice( &self ) -> &[u8] { &self.bytes }

	/// A cursor over the buffer, starting at the first argument.
	#[inline] pub fn cursor( &mut self ) -> ArgCursor<'_> { ArgCursor::new( &mut self.bytes ) }

}

/// Failures acquiring an [`ArgBuffer`].
#[derive( Error, Debug, Clone, PartialEq, Eq )]
pub enum BufferError {
	#[error( "Argument lengths overflow the address space" )] Overflow,
	#[error( "Allocation failed: {0}" )] Alloc( #[from] TryReserveError ),
}

/// Splits the argument buffer into consecutive arguments.
///
/// Arguments carry no delimiters, only their lengths, so each [`ArgCursor::take`]
/// hands out the next `len` bytes and moves past them.
#[derive( Debug )]
pub struct ArgCursor<'a> {
	remaining: &'a mut [u8],
	position: usize,
}

impl<'a> ArgCursor<'a> {

	pub fn new( buffer: &'a mut [u8] ) -> Self {
		Self { remaining: buffer, position: 0 }
	}

	/// Takes the next `len` bytes as one argument.
	///
	/// # Errors
	/// [`ArgError::Exhausted`] if fewer than `len` bytes remain. The cursor is left
	/// untouched in that case.
	pub fn take( &mut self, len: usize ) -> Result<&'a mut [u8], ArgError> {
		if len > self.remaining.len() {
			return Err( ArgError::Exhausted { requested: len, remaining: self.remaining.len() });
		}
		let ( argument, rest ) = std::mem::take( &mut self.remaining ).split_at_mut( len );
		self.remaining = rest ;
		self.position += len ;
		Ok( argument )
	}

	/// Takes one argument per entry of `lengths`, in order.
	///
	/// # Errors
	/// [`ArgError::Exhausted`] as soon as one of the arguments doesn't fit.
	pub fn take_all( &mut self, lengths: &[usize] ) -> Result<Vec<&'a mut [u8]>, ArgError> {
		lengths.iter().map(| len | self.take( *len )).collect()
	}

	/// Offset of the next argument from the start of the buffer.
	#[inline] pub fn position( &self ) -> usize { self.position }

	#[inline] pub fn remaining( &self ) -> usize { self.remaining.len() }

	#[inline] pub fn is_exhausted( &self ) -> bool { self.remaining.is_empty() }

}
