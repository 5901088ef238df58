use wasm_minimal_protocol::host::{ CallOutcome, PluginInstance };
use wasmtime::{ Config, Engine };

fn burn_with_fuel( fuel: u64 ) -> PluginInstance<()> {

	let mut config = Config::new();
	config.consume_fuel( true );
	let engine = Engine::new( &config ).expect( "failed to create engine" );

	let mut plugin = crate::fixtures::plugin( "protocol", &engine, () )
		.with_fuel_limiter( move | _ctx, _function, _args | fuel )
		.instantiate()
		.expect( "failed to instantiate plugin" );

	let _ = plugin.call( "burn", &[] );
	plugin

}

#[test]
fn insufficient_fuel_aborts() {
	let plugin = burn_with_fuel( 1_000 );
	assert!( plugin.is_poisoned() );
	assert_eq!( plugin.last_call().expect( "call should be recorded" ).status, None );
}

#[test]
fn sufficient_fuel_completes() {
	let mut plugin = burn_with_fuel( 10_000_000 );
	assert!( !plugin.is_poisoned() );
	match plugin.call( "returns_ok", &[] ) {
		Ok( CallOutcome::Success( payload )) => assert_eq!( payload, b"This is an `Ok`" ),
		other => panic!( "Expected Success, found: {:#?}", other ),
	}
}

#[test]
fn exhaustion_is_reported_as_abort() {

	let mut config = Config::new();
	config.consume_fuel( true );
	let engine = Engine::new( &config ).expect( "failed to create engine" );

	let mut plugin = crate::fixtures::plugin( "protocol", &engine, () )
		.with_fuel_limiter(| _, _, _ | 10 )
		.instantiate()
		.expect( "failed to instantiate plugin" );

	match plugin.call( "burn", &[] ) {
		Ok( CallOutcome::Aborted( _ )) => {}
		other => panic!( "Expected Aborted, found: {:#?}", other ),
	}

}
