//! Plugin loading and configuration.
//!
//! A [`Plugin`] is a compiled module that passed validation, bundled with the
//! embedder's context and any resource limits. Nothing runs until
//! [`Plugin::instantiate`] is called.

use std::path::Path ;
use wasmtime::{ Engine, Linker, Module, ResourceLimiter };

use super::linker::add_protocol_imports ;
use super::plugin_instance::PluginInstance ;
use super::validate::{ validate_module, LoadError };



/// Computes a per-call budget from the context, the function name and its arguments.
pub(crate) type CallLimiter<Ctx> = Box<dyn FnMut( &mut Ctx, &str, &[&[u8]] ) -> u64 + Send>;

/// Projects the [`ResourceLimiter`] out of the context.
pub type MemoryLimiter<Ctx> = fn( &mut Ctx ) -> &mut dyn ResourceLimiter ;

/// Limits applied to every instance created from a plugin. Survive reinstantiation.
pub(crate) struct Limiters<Ctx> {
	pub fuel: Option<CallLimiter<Ctx>>,
	pub epoch: Option<CallLimiter<Ctx>>,
	pub memory: Option<MemoryLimiter<Ctx>>,
}

impl<Ctx> Default for Limiters<Ctx> {
	fn default() -> Self { Self { fuel: None, epoch: None, memory: None }}
}

impl<Ctx> std::fmt::Debug for Limiters<Ctx> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Limiters" )
			.field( "fuel", &self.fuel.as_ref().map(| _ | "<closure>" ))
			.field( "epoch", &self.epoch.as_ref().map(| _ | "<closure>" ))
			.field( "memory", &self.memory.as_ref().map(| _ | "<fn>" ))
			.finish()
	}
}

/// A validated plugin module bundled with its runtime context, ready for instantiation.
///
/// The `context` becomes the store data of the instance and is available to
/// the limiters. The protocol's own bookkeeping is kept next to it, so any
/// type will do.
///
/// # Example
///
/// ```
/// use wasm_minimal_protocol::host::{ Plugin, CallOutcome };
/// use wasmtime::Engine ;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = Engine::default();
/// let plugin = Plugin::new( &engine, r#"(module
/// 	(import "typst_env" "wasm_minimal_protocol_send_result_to_host" (func $send (param i32 i32)))
/// 	(memory (export "memory") 1)
/// 	(data (i32.const 0) "pong")
/// 	(func (export "ping") (result i32)
/// 		(call $send (i32.const 0) (i32.const 4))
/// 		(i32.const 0))
/// )"#, () )?;
///
/// let mut instance = plugin.instantiate()?;
/// match instance.call( "ping", &[] )? {
/// 	CallOutcome::Success( payload ) => assert_eq!( payload, b"pong" ),
/// 	other => panic!( "unexpected outcome: {other:?}" ),
/// }
/// # Ok(())
/// # }
/// ```
#[must_use = "call .instantiate() to create a PluginInstance"]
pub struct Plugin<Ctx: 'static> {
	module: Module,
	context: Ctx,
	limiters: Limiters<Ctx>,
}

impl<Ctx> Plugin<Ctx>
where
	Ctx: Send + 'static,
{

	/// Compiles and validates a plugin from binary WebAssembly or WAT text.
	///
	/// # Errors
	/// Returns [`LoadError::Compile`] if the bytes don't compile, or another
	/// [`LoadError`] if the module can't be driven through the protocol.
	pub fn new( engine: &Engine, bytes: impl AsRef<[u8]>, context: Ctx ) -> Result<Self, LoadError> {
		Module::new( engine, bytes )
			.map_err( LoadError::Compile )
			.and_then(| module | Self::from_module( module, context ))
	}

	/// Compiles and validates a plugin from a `.wasm` or `.wat` file.
	///
	/// # Errors
	/// See [`Plugin::new`].
	pub fn from_file( engine: &Engine, path: impl AsRef<Path>, context: Ctx ) -> Result<Self, LoadError> {
		Module::from_file( engine, path )
			.map_err( LoadError::Compile )
			.and_then(| module | Self::from_module( module, context ))
	}

	/// Validates an already compiled module.
	///
	/// # Errors
	/// Returns a [`LoadError`] if the module imports anything other than the
	/// protocol primitives, declares them with the wrong type, or doesn't
	/// export its memory.
	pub fn from_module( module: Module, context: Ctx ) -> Result<Self, LoadError> {
		validate_module( &module )?;
		tracing::debug!( name = module.name(), "loaded plugin module" );
		Ok( Self { module, context, limiters: Limiters::default() })
	}

	/// Sets a closure that determines the fuel budget of each call.
	///
	/// The closure receives the context, the function name and the arguments.
	/// Fuel is reset to 0 after every call so leftovers never carry over.
	/// The engine must be created with [`wasmtime::Config::consume_fuel`]
	/// enabled or calls fail with
	/// [`DispatchError::FuelUnavailable`]( super::DispatchError::FuelUnavailable ).
	///
	/// ```
	/// # use wasm_minimal_protocol::host::Plugin ;
	/// # use wasmtime::{ Config, Engine };
	/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
	/// let engine = Engine::new( Config::new().consume_fuel( true ))?;
	/// // Budget scales with the input size
	/// let plugin = Plugin::new( &engine, r#"(module (memory (export "memory") 1))"#, () )?
	/// 	.with_fuel_limiter(| _, _, args | 10_000 + 100 * args.iter().map(| arg | arg.len() as u64 ).sum::<u64>() );
	/// # Ok(())
	/// # }
	/// ```
	pub fn with_fuel_limiter(
		mut self,
		limiter: impl FnMut( &mut Ctx, &str, &[&[u8]] ) -> u64 + Send + 'static,
	) -> Self {
		self.limiters.fuel = Some( Box::new( limiter ));
		self
	}

	/// Sets a closure that determines the epoch deadline of each call, in ticks.
	///
	/// The engine must be created with [`wasmtime::Config::epoch_interruption`]
	/// enabled, and something has to call [`Engine::increment_epoch`] for the
	/// deadline to ever pass.
	pub fn with_epoch_limiter(
		mut self,
		limiter: impl FnMut( &mut Ctx, &str, &[&[u8]] ) -> u64 + Send + 'static,
	) -> Self {
		self.limiters.epoch = Some( Box::new( limiter ));
		self
	}

	/// Installs a [`ResourceLimiter`] stored in the context.
	///
	/// Denied memory growth shows up in the guest as a failed `memory.grow`,
	/// which the guest runtime reports as a failure without a payload.
	pub fn with_memory_limiter( mut self, limiter: MemoryLimiter<Ctx> ) -> Self {
		self.limiters.memory = Some( limiter );
		self
	}

	/// The names of the functions callable through the protocol.
	pub fn functions( &self ) -> impl Iterator<Item = &str> {
		super::plugin_instance::entry_points( &self.module )
	}

	/// Links the protocol primitives and instantiates the module.
	///
	/// A start function, if the module has one, runs here.
	///
	/// # Errors
	/// Returns an error if linking or instantiation fails.
	pub fn instantiate( self ) -> Result<PluginInstance<Ctx>, wasmtime::Error> {
		let mut linker = Linker::new( self.module.engine() );
		add_protocol_imports( &mut linker )?;
		PluginInstance::start( self.module, linker, self.context, self.limiters )
	}

}

impl<Ctx: std::fmt::Debug> std::fmt::Debug for Plugin<Ctx> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Plugin" )
			.field( "module", &self.module.name().unwrap_or( "<Module>" ))
			.field( "context", &self.context )
			.field( "limiters", &self.limiters )
			.finish()
	}
}
