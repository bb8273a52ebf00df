use proc_macro::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Fields};

/// Implements `GameState` and `NamedState` for a struct with named fields. Only fields tagged
/// with `#[game_state]` are visible to the save/load engine, in declaration order.
///
/// ```ignore
/// #[derive(GameState)]
/// struct Player {
///     #[game_state]
///     health: i32,
///     #[game_state]
///     inventory: Vec<Option<Entity>>,
///     avatar_sprite: usize, // Not persisted.
/// }
/// ```
#[proc_macro_derive(GameState, attributes(game_state))]
pub fn game_state(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);
    match impl_game_state(&ast) {
        Ok(gen) => gen.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn impl_game_state(ast: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &ast.ident;
    let name_str = name.to_string();

    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new(
            ast.generics.span(),
            "GameState cannot be derived for generic types",
        ));
    }

    let fields = match &ast.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new(
                    data.fields.span(),
                    "GameState requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                ast.span(),
                "GameState can only be derived for structs",
            ))
        }
    };

    let mut idents = Vec::new();
    let mut names = Vec::new();
    let mut tys = Vec::new();
    for field in fields {
        if !field.attrs.iter().any(|attr| attr.path.is_ident("game_state")) {
            continue;
        }

        // Named fields always carry an ident.
        let ident = field.ident.as_ref().unwrap();
        let ident_str = ident.to_string();
        names.push(ident_str.trim_start_matches("r#").to_owned());
        idents.push(ident.clone());
        tys.push(field.ty.clone());
    }

    Ok(quote! {
        impl ::gs_save_load::field::NamedState for #name {
            const NAME: &'static str = #name_str;
        }

        impl ::gs_save_load::field::GameState for #name {
            #[inline]
            fn type_name(&self) -> &'static str {
                #name_str
            }

            fn fields(&self) -> &'static [::gs_save_load::field::FieldInfo] {
                static FIELDS: ::std::sync::OnceLock<
                    ::std::vec::Vec<::gs_save_load::field::FieldInfo>,
                > = ::std::sync::OnceLock::new();
                FIELDS.get_or_init(|| {
                    ::std::vec![
                        #(
                            ::gs_save_load::field::FieldInfo::new(
                                #names,
                                <#tys as ::gs_save_load::field::Persistable>::field_type(),
                            )
                        ),*
                    ]
                })
            }

            fn get_field(&self, name: &str) -> ::std::option::Option<::gs_save_load::field::FieldValue> {
                match name {
                    #(
                        #names => ::std::option::Option::Some(
                            ::gs_save_load::field::Persistable::to_field_value(&self.#idents),
                        ),
                    )*
                    _ => ::std::option::Option::None,
                }
            }

            fn set_field(&mut self, name: &str, value: ::gs_save_load::field::FieldValue) -> bool {
                match name {
                    #(
                        #names => match <#tys as ::gs_save_load::field::Persistable>::from_field_value(value) {
                            ::std::option::Option::Some(value) => {
                                self.#idents = value;
                                true
                            }
                            ::std::option::Option::None => false,
                        },
                    )*
                    _ => {
                        let _ = value;
                        false
                    }
                }
            }

            #[inline]
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    })
}
