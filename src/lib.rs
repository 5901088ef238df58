//! Both halves of the wasm minimal protocol: a byte-oriented calling convention
//! between a host and sandboxed WebAssembly plugins.
//!
//! The only thing that crosses the boundary is bytes. The host calls an export
//! with the length of each argument; the guest allocates a buffer of their
//! summed length, asks the host to fill it, computes, hands the result back
//! through a second primitive and returns a [`Status`]( abi::Status ).
//!
//! # Modules
//!
//! - [`abi`]: names and codes shared by both sides.
//!
//! - [`guest`]: the runtime a plugin links against. Handles buffer ownership,
//! 	argument splitting and result handoff so plugin authors only write the
//! 	computation, usually through the [`wasm_func`] attribute.
//!
//! - `host` (feature `host`, on by default): loads plugin modules with wasmtime,
//! 	provides the primitives, enforces the protocol and classifies outcomes.
//!
//! # Writing a plugin
//!
//! Plugins are `cdylib` crates built for `wasm32-unknown-unknown` with
//! `default-features = false` and `panic = "abort"`:
//!
//! ```
//! use wasm_minimal_protocol::wasm_func ;
//!
//! #[wasm_func]
//! fn concatenate( first: &[u8], second: &[u8] ) -> Vec<u8> {
//! 	[ first, b"*", second ].concat()
//! }
//!
//! #[wasm_func]
//! fn parse_number( text: &[u8] ) -> Result<String, String> {
//! 	let text = std::str::from_utf8( text ).map_err(| err | err.to_string() )?;
//! 	text.trim().parse::<i64>()
//! 		.map(| n | ( n * 2 ).to_string() )
//! 		.map_err(| err | format!( "not a number: {err}" ))
//! }
//! # fn main() {}
//! ```
//!
//! A function may return anything implementing [`guest::IntoOutput`]: byte
//! containers and strings always succeed, while `Result<T, E>` reports `Err`
//! as a failure with `E`'s `Display` text as the diagnostic.
//!
//! # Running a plugin
//!
//! ```
//! # #[cfg( feature = "host" )]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use wasm_minimal_protocol::host::{ CallOutcome, Plugin };
//! use wasmtime::Engine ;
//!
//! let engine = Engine::default();
//! let mut plugin = Plugin::new( &engine, r#"(module
//! 	(import "typst_env" "wasm_minimal_protocol_send_result_to_host" (func $send (param i32 i32)))
//! 	(memory (export "memory") 1)
//! 	(data (i32.const 0) "This is an `Err`")
//! 	(func (export "returns_err") (result i32)
//! 		(call $send (i32.const 0) (i32.const 16))
//! 		(i32.const 1))
//! )"#, () )?.instantiate()?;
//!
//! match plugin.call( "returns_err", &[] )? {
//! 	CallOutcome::Failure( diagnostic ) => assert_eq!( diagnostic, b"This is an `Err`" ),
//! 	other => panic!( "unexpected outcome: {other:?}" ),
//! }
//! # Ok(())
//! # }
//! # #[cfg( not( feature = "host" ))] fn main() {}
//! ```
//!
//! # Resource Limits
//!
//! Every limit is optional and attached to the `host::Plugin` before it is
//! instantiated. The fuel and epoch limiters are closures run before each call
//! with the plugin's context, the name of the function about to run and its
//! argument bytes, so a budget can scale with the input:
//!
//! - `with_fuel_limiter( | ctx, function, args | ... )` returns the fuel for the
//! 	call. The engine needs [`Config::consume_fuel`]( wasmtime::Config::consume_fuel ),
//! 	otherwise the call is refused before the guest runs. Unused fuel is
//! 	dropped once the call returns.
//!
//! - `with_epoch_limiter( | ctx, function, args | ... )` returns the deadline in
//! 	ticks. The engine needs [`Config::epoch_interruption`]( wasmtime::Config::epoch_interruption )
//! 	and something calling `Engine::increment_epoch`.
//!
//! - `with_memory_limiter( | ctx | &mut ctx.limits )` points at a
//! 	[`ResourceLimiter`]( wasmtime::ResourceLimiter ) kept in the context. It
//! 	stays installed for the instance's whole life. A denied `memory.grow` is
//! 	not a trap: the guest runtime answers with a bare failure status, which
//! 	the host reports as `CallOutcome::NoPayload`.
//!
//! Running out of fuel or passing the deadline ends the call as
//! `CallOutcome::Aborted` and poisons the instance.
//!
//! ```
//! # #[cfg( feature = "host" )]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # use wasm_minimal_protocol::host::Plugin ;
//! use wasmtime::{ Engine, StoreLimits, StoreLimitsBuilder };
//!
//! struct Ctx { limits: StoreLimits }
//!
//! let engine = Engine::default();
//! let plugin = Plugin::new( &engine, r#"(module (memory (export "memory") 1))"#, Ctx {
//! 	limits: StoreLimitsBuilder::new().memory_size( 10 * 1024 * 1024 ).build(), // 10 MiB
//! })?.with_memory_limiter(| ctx | &mut ctx.limits )
//! 	.instantiate()?;
//! # let _ = plugin ;
//! # Ok(())
//! # }
//! # #[cfg( not( feature = "host" ))] fn main() {}
//! ```

pub mod abi ;
pub mod guest ;
#[cfg( feature = "host" )]
pub mod host ;

pub use wasm_minimal_protocol_macros::wasm_func ;
