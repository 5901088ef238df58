//! Names and codes both sides of the protocol agree on.
//!
//! Imports live in a fixed host namespace. Exports are plain functions taking
//! one `i32` byte length per argument and returning an `i32` [`Status`].

/// Module namespace the host provides the protocol imports under.
pub const IMPORT_MODULE: &str = "typst_env" ;

/// `send_result_to_host( ptr: i32, len: i32 )`
pub const SEND_RESULT_TO_HOST: &str = "wasm_minimal_protocol_send_result_to_host" ;

/// `write_args_to_buffer( ptr: i32 )`
pub const WRITE_ARGS_TO_BUFFER: &str = "wasm_minimal_protocol_write_args_to_buffer" ;

/// Name of the linear memory the guest must export.
pub const MEMORY_EXPORT: &str = "memory" ;

/// Status code returned by every exported function.
///
/// `0` means the result payload is the function's output, anything else means
/// the payload is a diagnostic. The payload itself has the same shape either way.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug )]
pub struct Status( i32 );

impl Status {

	pub const SUCCESS: Self = Self( 0 );

	/// The code the guest runtime uses for every failure it reports.
	pub const FAILURE: Self = Self( 1 );

	#[inline] pub const fn code( self ) -> i32 { self.0 }

	#[inline] pub const fn is_success( self ) -> bool { self.0 == 0 }

}

impl From<i32> for Status {
	#[inline] fn from( code: i32 ) -> Self { Self( code ) }
}

impl From<Status> for i32 {
	#[inline] fn from( status: Status ) -> Self { status.0 }
}

impl std::fmt::Display for Status {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self.is_success() {
			true => write!( f, "success" ),
			false => write!( f, "failure ({})", self.0 ),
		}
	}
}
