#[test]
fn only_protocol_shaped_exports_are_listed() {

	let plugin = crate::fixtures::protocol();

	assert!( plugin.has_function( "double_it" ));
	assert!( plugin.has_function( "shuffle" ));
	assert!( !plugin.has_function( "wide_length" ));
	assert!( !plugin.has_function( "no_status" ));
	assert!( !plugin.has_function( "memory" ));

	let functions = plugin.functions().collect::<Vec<_>>();
	assert!( functions.contains( &"hello" ));
	assert!( functions.contains( &"will_panic" ));

}
