//! Guest half of the protocol: what runs inside the plugin module.
//!
//! Every exported function follows the same sequence, implemented once by
//! [`invoke`]:
//!
//! 1. Sum the argument lengths and acquire an [`ArgBuffer`] of exactly that size.
//! 	If either step fails, return a failure status without touching the host.
//! 2. Ask the host to write the arguments into it (only when the function takes
//! 	arguments).
//! 3. Split the buffer with an [`ArgCursor`] and run the function body.
//! 4. Send the result (or the diagnostic) to the host exactly once.
//! 5. Return the [`Status`]. Both buffers are owned, so they are released on
//! 	every path.
//!
//! Most plugins don't call [`invoke`] themselves but let
//! [`wasm_func`]( crate::wasm_func ) generate the exported wrapper.
//!
//! A panic inside the body is not caught. Plugins are built with
//! `panic = "abort"`, so a panic traps the module and the host observes it as
//! an abort, never as a status code.

mod arg_buffer ;
mod imports ;
mod output ;
#[cfg( not( target_arch = "wasm32" ))]
pub mod testing ;

use crate::abi::Status ;

pub use arg_buffer::{ total_len, ArgBuffer, ArgCursor, ArgError, BufferError };
pub use imports::{ HostImports, TypstEnv };
#[cfg( not( target_arch = "wasm32" ))]
pub use imports::{ install_host, HostGuard };
pub use output::{ IntoOutput, IntoResultBuffer, Reply, ResultBuffer };



/// Runs one protocol call and returns the status code to hand back to the host.
///
/// `lengths` is the argument descriptor the host passed in. `body` takes the
/// arguments from the cursor and produces a [`Reply`]; an [`ArgError`] it
/// returns is reported to the host as a failure with the error as diagnostic.
pub fn invoke<H, F>( host: &H, lengths: &[usize], body: F ) -> i32
where
	H: HostImports + ?Sized,
	F: FnOnce( &mut ArgCursor<'_> ) -> Result<Reply, ArgError>,
{

	let Ok( mut args ) = ArgBuffer::for_lengths( lengths ) else {
		return Status::FAILURE.code()
	};

	if !lengths.is_empty() {
		host.write_args_to_buffer( args.as_mut_slice() );
	}

	let reply = body( &mut args.cursor() ).unwrap_or_else(| err | Reply::failure( &err ));
	let ( result, status ) = reply.into_parts();
	let Ok( result ) = result else {
		return Status::FAILURE.code()
	};

	host.send_result_to_host( result.as_slice() );
	status.code()

}
