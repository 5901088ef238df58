use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ quote, format_ident };
use syn::{ parse_macro_input, FnArg, Ident, ItemFn, Pat, Type };
use pipe_trait::Pipe ;

/// Exports a function through the wasm minimal protocol.
///
/// The function must take only byte slices (`&[u8]` or `&mut [u8]`) and
/// return anything implementing `wasm_minimal_protocol::guest::IntoOutput`.
/// It is left untouched; next to it, an `extern "C"` wrapper taking one
/// length per argument is generated and exported under the function's name
/// when compiling for `wasm32`:
/// ```ignore
/// #[wasm_func]
/// fn concatenate( first: &[u8], second: &[u8] ) -> Vec<u8> { ... }
///
/// // expands to roughly
/// fn concatenate( first: &[u8], second: &[u8] ) -> Vec<u8> { ... }
///
/// #[cfg_attr( target_arch = "wasm32", export_name = "concatenate" )]
/// extern "C" fn __wasm_func_concatenate( __first_len: usize, __second_len: usize ) -> i32 {
///     wasm_minimal_protocol::guest::invoke( &TypstEnv, &[ __first_len, __second_len ], | __cursor | {
///         let first = __cursor.take( __first_len )?;
///         let second = __cursor.take( __second_len )?;
///         Ok( Reply::new( concatenate( first, second )))
///     })
/// }
/// ```
#[proc_macro_attribute]
pub fn wasm_func( attr: TokenStream, item: TokenStream ) -> TokenStream {

    let func = parse_macro_input!( item as ItemFn );

    match expand( attr.into(), func ) {
        Ok( tokens ) => tokens,
        Err( err ) => err.to_compile_error(),
    }.pipe( TokenStream::from )

}

fn expand( attr: TokenStream2, func: ItemFn ) -> syn::Result<TokenStream2> {

    let mut errors = Vec::new();

    if !attr.is_empty() {
        errors.push( syn::Error::new_spanned( &attr, "`wasm_func` takes no arguments" ));
    }
    if let Some( asyncness ) = &func.sig.asyncness {
        errors.push( syn::Error::new_spanned( asyncness, "exported functions can't be `async`" ));
    }
    if func.sig.generics.type_params().next().is_some() || func.sig.generics.const_params().next().is_some() {
        errors.push( syn::Error::new_spanned( &func.sig.generics, "exported functions can't be generic" ));
    }
    if let Some( variadic ) = &func.sig.variadic {
        errors.push( syn::Error::new_spanned( variadic, "exported functions can't be variadic" ));
    }

    let names = func.sig.inputs.iter()
        .filter_map(| arg | check_arg( arg ).map_err(| err | errors.push( err )).ok() )
        .collect::<Vec<_>>();

    if let Some( err ) = errors.into_iter().reduce(| mut combined, err | { combined.combine( err ); combined }) {
        return Err( err )
    }

    let name = &func.sig.ident;
    let export = name.to_string();
    let wrapper = format_ident!( "__wasm_func_{}", name );
    let lens = names.iter()
        .map(| arg | format_ident!( "__{}_len", arg ))
        .collect::<Vec<_>>();
    let vis = &func.vis;

    Ok( quote! {
        #func

        #[doc( hidden )]
        #[cfg_attr( target_arch = "wasm32", export_name = #export )]
        #[cfg_attr( not( target_arch = "wasm32" ), allow( dead_code ))]
        #vis extern "C" fn #wrapper( #( #lens: usize ),* ) -> i32 {
            ::wasm_minimal_protocol::guest::invoke(
                &::wasm_minimal_protocol::guest::TypstEnv,
                &[ #( #lens ),* ],
                | __cursor | {
                    #( let #names = __cursor.take( #lens )?; )*
                    ::core::result::Result::Ok( ::wasm_minimal_protocol::guest::Reply::new( #name( #( #names ),* )))
                },
            )
        }
    })

}

fn check_arg( arg: &FnArg ) -> syn::Result<Ident> {

    let FnArg::Typed( arg ) = arg else {
        return Err( syn::Error::new_spanned( arg, "exported functions can't take `self`" ))
    };

    if !is_byte_slice( &arg.ty ) {
        return Err( syn::Error::new_spanned( &arg.ty, "arguments must be `&[u8]` or `&mut [u8]`" ))
    }

    match &*arg.pat {
        Pat::Ident( pat ) if pat.by_ref.is_none() && pat.subpat.is_none() => Ok( pat.ident.clone() ),
        pat => Err( syn::Error::new_spanned( pat, "arguments must be plain identifiers" )),
    }

}

fn is_byte_slice( ty: &Type ) -> bool {
    match ty {
        Type::Reference( reference ) => match &*reference.elem {
            Type::Slice( slice ) => matches!( &*slice.elem, Type::Path( path ) if path.qself.is_none() && path.path.is_ident( "u8" )),
            _ => false,
        },
        Type::Paren( inner ) => is_byte_slice( &inner.elem ),
        Type::Group( inner ) => is_byte_slice( &inner.elem ),
        _ => false,
    }
}
