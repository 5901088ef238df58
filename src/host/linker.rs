use thiserror::Error ;
use wasmtime::{ Caller, Extern, Linker, Memory };

use crate::abi::{ IMPORT_MODULE, MEMORY_EXPORT, SEND_RESULT_TO_HOST, WRITE_ARGS_TO_BUFFER };



/// Ways a guest can break the protocol during a call.
///
/// Raised from inside the import primitives, which trap the guest so it can't
/// carry on with a half-finished exchange.
#[derive( Error, Debug, Clone, PartialEq, Eq )]
pub enum ProtocolViolation {
	/// `send_result_to_host` was called more than once in one call.
	#[error( "Result Sent Twice" )] ResultSentTwice,
	/// `write_args_to_buffer` was called more than once in one call.
	#[error( "Arguments Written Twice" )] ArgsWrittenTwice,
	/// The function returned success without sending a result.
	#[error( "Missing Result" )] MissingResult,
	/// A primitive pointed outside the guest's linear memory.
	#[error( "Out Of Bounds: {len} bytes at {ptr:#x}" )] OutOfBounds { ptr: u32, len: usize },
	/// The guest called a primitive without exporting its memory. Loading
	/// rejects such modules, so a validated plugin never reports this.
	#[error( "Missing Memory" )] MissingMemory,
}

/// Store data: the embedder's context plus the exchange state of the current call.
pub(crate) struct HostState<Ctx> {
	pub ctx: Ctx,
	pub call: CallState,
}

impl<Ctx> HostState<Ctx> {
	pub fn new( ctx: Ctx ) -> Self { Self { ctx, call: CallState::default() }}
}

/// Everything the primitives touch during one call. Replaced wholesale before
/// each call so nothing carries over.
#[derive( Debug, Default )]
pub(crate) struct CallState {
	/// Concatenated arguments, staged for `write_args_to_buffer`.
	pub args: Vec<u8>,
	/// Bytes written by `write_args_to_buffer`, if it was called.
	pub args_written: Option<usize>,
	/// Payload copied out by `send_result_to_host`.
	pub result: Option<Vec<u8>>,
	pub results_sent: u32,
	/// First violation raised during the call.
	pub violation: Option<ProtocolViolation>,
}

impl CallState {
	pub fn staged( args: Vec<u8> ) -> Self { Self { args, ..Self::default() }}
}

/// Adds the two protocol primitives to `linker` under [`IMPORT_MODULE`].
pub(crate) fn add_protocol_imports<Ctx: Send + 'static>( linker: &mut Linker<HostState<Ctx>> ) -> Result<(), wasmtime::Error> {
	linker.func_wrap(
		IMPORT_MODULE,
		WRITE_ARGS_TO_BUFFER,
		| mut caller: Caller<'_, HostState<Ctx>>, ptr: u32 | write_args( &mut caller, ptr ),
	)?;
	linker.func_wrap(
		IMPORT_MODULE,
		SEND_RESULT_TO_HOST,
		| mut caller: Caller<'_, HostState<Ctx>>, ptr: u32, len: u32 | send_result( &mut caller, ptr, len ),
	)?;
	Ok(())
}

fn write_args<Ctx: 'static>( caller: &mut Caller<'_, HostState<Ctx>>, ptr: u32 ) -> Result<(), wasmtime::Error> {

	if caller.data().call.args_written.is_some() {
		return Err( reject( caller, ProtocolViolation::ArgsWrittenTwice ));
	}
	let memory = guest_memory( caller )?;

	let args = std::mem::take( &mut caller.data_mut().call.args );
	let written = memory.write( &mut *caller, ptr as usize, &args );
	let len = args.len();
	caller.data_mut().call.args = args ;

	match written {
		Ok(()) => {
			tracing::trace!( ptr, len, "wrote arguments" );
			caller.data_mut().call.args_written = Some( len );
			Ok(())
		},
		Err( _ ) => Err( reject( caller, ProtocolViolation::OutOfBounds { ptr, len })),
	}

}

fn send_result<Ctx: 'static>( caller: &mut Caller<'_, HostState<Ctx>>, ptr: u32, len: u32 ) -> Result<(), wasmtime::Error> {

	if caller.data().call.results_sent > 0 {
		return Err( reject( caller, ProtocolViolation::ResultSentTwice ));
	}
	let memory = guest_memory( caller )?;

	let start = ptr as usize ;
	let len = len as usize ;
	let result = start.checked_add( len )
		.and_then(| end | memory.data( &*caller ).get( start..end ))
		.map( <[u8]>::to_vec );

	match result {
		Some( result ) => {
			tracing::trace!( ptr, len, "received result" );
			let state = &mut caller.data_mut().call ;
			state.results_sent += 1 ;
			state.result = Some( result );
			Ok(())
		},
		None => Err( reject( caller, ProtocolViolation::OutOfBounds { ptr, len })),
	}

}

fn guest_memory<Ctx: 'static>( caller: &mut Caller<'_, HostState<Ctx>> ) -> Result<Memory, wasmtime::Error> {
	match caller.get_export( MEMORY_EXPORT ).and_then( Extern::into_memory ) {
		Some( memory ) => Ok( memory ),
		None => Err( reject( caller, ProtocolViolation::MissingMemory )),
	}
}

/// Records `violation` for the dispatcher and turns it into a trap.
fn reject<Ctx: 'static>( caller: &mut Caller<'_, HostState<Ctx>>, violation: ProtocolViolation ) -> wasmtime::Error {
	tracing::warn!( %violation, "plugin violated the protocol" );
	caller.data_mut().call.violation.get_or_insert_with(|| violation.clone() );
	wasmtime::Error::new( violation )
}
