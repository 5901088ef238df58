//! A host double for exercising guest code natively.

use std::cell::RefCell ;

use super::HostImports ;



/// Plays the host side of the protocol in memory and records every primitive
/// call, so tests can check the guest's half of the handshake.
#[derive( Debug, Default )]
pub struct RecordingHost {
	args: Vec<u8>,
	writes: RefCell<Vec<usize>>,
	results: RefCell<Vec<Vec<u8>>>,
}

impl RecordingHost {

	/// A host that will write `args` concatenated, in order.
	pub fn new( args: &[&[u8]] ) -> Self {
		Self { args: args.concat(), ..Self::default() }
	}

	/// The argument lengths to pass to the export under test.
	pub fn lengths( args: &[&[u8]] ) -> Vec<usize> {
		args.iter().map(| arg | arg.len() ).collect()
	}

	/// Size of the buffer passed to each `write_args_to_buffer` call.
	pub fn writes( &self ) -> Vec<usize> { self.writes.borrow().clone() }

	/// Every payload passed to `send_result_to_host`, in order.
	pub fn results( &self ) -> Vec<Vec<u8>> { self.results.borrow().clone() }

	/// The payload, if exactly one was sent.
	pub fn result( &self ) -> Option<Vec<u8>> {
		match self.results.borrow().as_slice() {
			[ only ] => Some( only.clone() ),
			_ => None,
		}
	}

}

impl HostImports for RecordingHost {

	fn write_args_to_buffer( &self, buffer: &mut [u8] ) {
		self.writes.borrow_mut().push( buffer.len() );
		let len = buffer.len().min( self.args.len() );
		buffer[..len].copy_from_slice( &self.args[..len] );
	}

	fn send_result_to_host( &self, result: &[u8] ) {
		self.results.borrow_mut().push( result.to_vec() );
	}

}
