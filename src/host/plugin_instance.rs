use pipe_trait::Pipe ;
use thiserror::Error ;
use wasmtime::{ ExternType, Instance, Linker, Module, Store, Val };

use crate::abi::Status ;
use super::linker::{ CallState, HostState, ProtocolViolation };
use super::outcome::{ CallOutcome, CallRecord };
use super::plugin::Limiters ;
use super::validate::{ describe_func, is_entry_point };



/// An instantiated plugin with its store and instance, ready for dispatch.
///
/// Created by calling [`Plugin::instantiate`]( super::Plugin::instantiate ).
/// Calls take `&mut self`, so an instance runs one call at a time and a guest
/// can never reenter it.
///
/// After an abort or a protocol violation the guest may be left in any state,
/// so the instance refuses further calls until [`PluginInstance::reinstantiate`]
/// replaces it with a fresh one.
pub struct PluginInstance<Ctx: 'static> {
	store: Store<HostState<Ctx>>,
	instance: Instance,
	module: Module,
	linker: Linker<HostState<Ctx>>,
	limiters: Limiters<Ctx>,
	poisoned: bool,
	last_call: Option<CallRecord>,
}

impl<Ctx: std::fmt::Debug + 'static> std::fmt::Debug for PluginInstance<Ctx> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::result::Result<(), std::fmt::Error> {
		f.debug_struct( "PluginInstance" )
			.field( "context", &self.store.data().ctx )
			.field( "limiters", &self.limiters )
			.field( "poisoned", &self.poisoned )
			.field( "last_call", &self.last_call )
			.finish_non_exhaustive()
	}
}

/// Errors that can occur when dispatching a function call to a plugin.
///
/// Everything except [`DispatchError::ProtocolViolation`] is detected before
/// the guest runs.
#[derive( Error, Debug )]
pub enum DispatchError {
	/// An earlier call aborted or broke the protocol.
	#[error( "Poisoned: the plugin must be reinstantiated" )] Poisoned,
	/// The plugin doesn't export a function with this name.
	#[error( "Invalid Function: {0}" )] InvalidFunction( String ),
	/// The export isn't shaped like a protocol function.
	#[error( "Invalid Signature: {function} has type {found}, expected i32 lengths returning an i32" )]
	InvalidSignature { function: String, found: String },
	/// The number of arguments doesn't match the function's arity.
	#[error( "Invalid Argument List: {function} takes {expected} arguments, {found} given" )]
	InvalidArgumentList { function: String, expected: usize, found: usize },
	/// An argument is too long to describe with a 32-bit length.
	#[error( "Argument Too Large: {0} bytes" )] ArgumentTooLarge( usize ),
	/// A fuel limiter is set but the engine doesn't consume fuel.
	#[error( "Fuel Unavailable: {0}" )] FuelUnavailable( wasmtime::Error ),
	/// The guest broke the protocol.
	#[error( "Protocol Violation: {0}" )] ProtocolViolation( #[from] ProtocolViolation ),
}

impl<Ctx: Send + 'static> PluginInstance<Ctx> {

	pub(crate) fn start(
		module: Module,
		linker: Linker<HostState<Ctx>>,
		context: Ctx,
		limiters: Limiters<Ctx>,
	) -> Result<Self, wasmtime::Error> {

		let mut store = Store::new( module.engine(), HostState::new( context ));
		if let Some( limiter ) = limiters.memory {
			store.limiter( move | state | limiter( &mut state.ctx ));
		}
		let instance = linker.instantiate( &mut store, &module )?;
		tracing::debug!( name = module.name(), "instantiated plugin" );

		Ok( Self { store, instance, module, linker, limiters, poisoned: false, last_call: None })

	}

	/// Calls `function` with `args`, running the whole protocol exchange.
	///
	/// # Errors
	/// Returns a [`DispatchError`] if the call is rejected before running or
	/// the guest breaks the protocol. Guest failures and aborts are not errors;
	/// they are reported through the [`CallOutcome`].
	pub fn call( &mut self, function: &str, args: &[&[u8]] ) -> Result<CallOutcome, DispatchError> {

		if self.poisoned { return Err( DispatchError::Poisoned ) }

		let func = self.instance
			.get_func( &mut self.store, function )
			.ok_or_else(|| DispatchError::InvalidFunction( function.to_string() ))?;
		let ty = func.ty( &self.store );
		if !is_entry_point( &ty ) {
			return Err( DispatchError::InvalidSignature { function: function.to_string(), found: describe_func( &ty ) })
		}
		if ty.params().len() != args.len() {
			return Err( DispatchError::InvalidArgumentList {
				function: function.to_string(),
				expected: ty.params().len(),
				found: args.len(),
			})
		}

		let params = args.iter()
			.map(| arg | encode_length( arg.len() ))
			.collect::<Result<Vec<_>, _>>()?;
		let declared_len = args.iter().map(| arg | arg.len() ).sum::<usize>();

		self.store.data_mut().call = args.concat().pipe( CallState::staged );

		let fuel_was_set = if let Some( limiter ) = self.limiters.fuel.as_mut() {
			let fuel = limiter( &mut self.store.data_mut().ctx, function, args );
			self.store.set_fuel( fuel ).map_err( DispatchError::FuelUnavailable )?;
			true
		} else { false };

		if let Some( limiter ) = self.limiters.epoch.as_mut() {
			let ticks = limiter( &mut self.store.data_mut().ctx, function, args );
			self.store.set_epoch_deadline( ticks );
		}

		tracing::debug!( function, len = declared_len, "calling plugin function" );
		let mut results = [ Val::I32( 0 ) ];
		let call_result = func.call( &mut self.store, &params, &mut results );

		// Reset fuel to 0 after call to prevent leakage to subsequent calls
		if fuel_was_set { let _ = self.store.set_fuel( 0 ); }

		let call = std::mem::take( &mut self.store.data_mut().call );
		let status = match call_result {
			Ok(()) => results[0].i32().map( Status::from ),
			Err( _ ) => None,
		};
		self.last_call = Some( CallRecord {
			function: function.to_string(),
			declared_len,
			args_written: call.args_written,
			results_sent: call.results_sent,
			status,
		});

		if let Some( violation ) = call.violation {
			self.poisoned = true ;
			return Err( violation.into() )
		}

		match ( call_result, status ) {
			( Err( trap ), _ ) => {
				tracing::warn!( function, error = %trap, "plugin function aborted" );
				self.poisoned = true ;
				Ok( CallOutcome::Aborted( trap ))
			},
			( Ok(()), Some( status )) => self.classify( function, status, call.result ),
			( Ok(()), None ) => Err( DispatchError::InvalidSignature {
				function: function.to_string(),
				found: describe_func( &ty ),
			}),
		}

	}

	fn classify( &mut self, function: &str, status: Status, result: Option<Vec<u8>> ) -> Result<CallOutcome, DispatchError> {
		tracing::debug!( function, %status, sent = result.is_some(), "plugin function returned" );
		match ( status.is_success(), result ) {
			( true, Some( payload )) => Ok( CallOutcome::Success( payload )),
			( true, None ) => {
				tracing::warn!( function, violation = %ProtocolViolation::MissingResult, "plugin violated the protocol" );
				self.poisoned = true ;
				Err( ProtocolViolation::MissingResult.into() )
			},
			( false, Some( diagnostic )) => Ok( CallOutcome::Failure( diagnostic )),
			( false, None ) => Ok( CallOutcome::NoPayload { status }),
		}
	}

	/// Replaces this instance with a fresh one from the same module, keeping
	/// the context and limiters. Clears the poisoned state.
	///
	/// # Errors
	/// Returns an error if instantiation fails.
	pub fn reinstantiate( self ) -> Result<Self, wasmtime::Error> {
		let Self { store, module, linker, limiters, .. } = self ;
		tracing::debug!( name = module.name(), "reinstantiating plugin" );
		Self::start( module, linker, store.into_data().ctx, limiters )
	}

	/// Whether an earlier call aborted or broke the protocol.
	pub fn is_poisoned( &self ) -> bool { self.poisoned }

	/// What happened during the most recent call that reached the guest.
	pub fn last_call( &self ) -> Option<&CallRecord> { self.last_call.as_ref() }

	/// The names of the functions callable through the protocol.
	pub fn functions( &self ) -> impl Iterator<Item = &str> { entry_points( &self.module ) }

	pub fn has_function( &self, function: &str ) -> bool {
		self.functions().any(| name | name == function )
	}

	pub fn context( &self ) -> &Ctx { &self.store.data().ctx }

	pub fn context_mut( &mut self ) -> &mut Ctx { &mut self.store.data_mut().ctx }

}

/// Lengths cross the boundary as `i32` carrying the bits of a `u32`.
fn encode_length( len: usize ) -> Result<Val, DispatchError> {
	u32::try_from( len )
		.map(| len | Val::I32( len.cast_signed() ))
		.map_err(| _ | DispatchError::ArgumentTooLarge( len ))
}

pub(crate) fn entry_points( module: &Module ) -> impl Iterator<Item = &str> {
	module.exports().filter_map(| export | match export.ty() {
		ExternType::Func( ty ) if is_entry_point( &ty ) => Some( export.name() ),
		_ => None,
	})
}
