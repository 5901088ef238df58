use wasm_minimal_protocol::host::{ CallOutcome, DispatchError };

#[test]
fn fuel_limiter_requires_fuel_enabled_engine() {

	let mut plugin = crate::fixtures::plugin( "protocol", &crate::fixtures::ENGINE, () )
		.with_fuel_limiter(| _, _, _ | 1_000 )
		.instantiate()
		.expect( "failed to instantiate plugin" );

	match plugin.call( "hello", &[] ) {
		Err( DispatchError::FuelUnavailable( _ )) => {}
		other => panic!( "Expected FuelUnavailable, found: {:#?}", other ),
	}

	// Rejected before running the guest
	assert!( !plugin.is_poisoned() );
	assert!( plugin.last_call().is_none() );

}

#[test]
fn no_limiter_means_no_fuel_accounting() {
	let mut plugin = crate::fixtures::protocol();
	assert!( matches!( plugin.call( "burn", &[] ), Ok( CallOutcome::Success( _ ))));
}
