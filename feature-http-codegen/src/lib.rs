use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use quote::quote_spanned;
use std::path::{Path, PathBuf};

/// Turns a function into a test that runs a feature file.
///
/// ```ignore
/// #[feature_test("features/login.feature", login_handler)]
/// fn login() {}
/// ```
///
/// The path is relative to the crate's manifest directory and must name an
/// existing `.feature` file. The second argument is a function taking
/// `&mut FeatureConfiguration` and returning the handler under test. It is
/// called again for every scenario, so no state leaks between scenarios. The
/// function body runs before the feature file.
#[proc_macro_attribute]
pub fn feature_test(attrs: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    let args = syn::parse_macro_input!(attrs as syn::AttributeArgs);

    let attributes = &input.attrs;
    let visibility = &input.vis;
    let signature = &input.sig;
    let block = &input.block;

    if args.len() != 2 {
        return quote! {
            compile_error!("A feature file path and a setup function should be passed to the macro");
        }
        .into();
    }

    if !signature.inputs.is_empty() {
        return quote_spanned! {signature.ident.span()=>
            compile_error!("A feature test can not take arguments!");
        }
        .into();
    }

    let feature_path = if let syn::NestedMeta::Lit(syn::Lit::Str(parsed_path)) = &args[0] {
        let feature_path = parsed_path.value();
        if let Err(stream) = validate_feature_path(&feature_path, parsed_path.span()) {
            return stream.into();
        }
        feature_path
    } else {
        return quote! {
            compile_error!("The first argument should be a string literal!");
        }
        .into();
    };

    let setup_function = if let syn::NestedMeta::Meta(syn::Meta::Path(function_path)) = &args[1] {
        function_path
    } else {
        return quote! {
            compile_error!("The second argument should be a setup function!");
        }
        .into();
    };

    let output = quote! {
        #[test]
        #(#attributes)*
        #visibility #signature {
            (|| #block)();

            ::feature_http::TestSession::assert_feature(
                concat!(env!("CARGO_MANIFEST_DIR"), "/", #feature_path),
                || {
                    let mut __feature_configuration = ::feature_http::FeatureConfiguration::new();
                    let __feature_handler = #setup_function(&mut __feature_configuration);

                    ::feature_http::FeatureContext::with_configuration(
                        __feature_handler,
                        __feature_configuration,
                    )
                },
            );
        }
    };

    TokenStream::from(output)
}

fn validate_feature_path<P: AsRef<Path>>(
    path: P,
    span: Span,
) -> Result<(), proc_macro2::TokenStream> {
    let path = path.as_ref();

    if !path.to_string_lossy().ends_with(".feature") {
        return Err(quote_spanned! {span=>
            compile_error!("The path should point to a .feature file!");
        });
    }

    if path.is_absolute() {
        return Err(quote_spanned! {span=>
            compile_error!("The path should be relative to the crate's manifest directory!");
        });
    }

    if let Some(manifest_dir) = std::env::var_os("CARGO_MANIFEST_DIR") {
        let full_path = PathBuf::from(manifest_dir).join(path);

        if !full_path.is_file() {
            let message = format!("Feature file {} does not exist!", full_path.display());
            return Err(quote_spanned! {span=>
                compile_error!(#message);
            });
        }
    }

    Ok(())
}
