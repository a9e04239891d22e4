/// Attaches a type-scope [`Marker`](crate::marker::Marker) to a service type
/// before `main` runs, with the following parameters:
/// * `$target`: The service type to mark
/// * `$marker`: A `Marker` expression (optional; defaults to `Marker::new()`)
#[macro_export]
macro_rules! profile_type {
    ($target:ident, $marker:expr) => {
        $crate::paste::paste! {
            $crate::ctor::declarative::ctor!{
                #[ctor]
                fn [<_attach_type_marker_ $target:snake>]() {
                    $crate::selector::markers()
                        .attach_type(::std::any::type_name::<$target>(), $marker);
                }
            }
        }
    };

    ($target:ident) => {
        $crate::profile_type!($target, $crate::marker::Marker::new());
    };
}
pub use profile_type;

/// Attaches a method-scope [`Marker`](crate::marker::Marker) to one method of
/// a service type before `main` runs. A method marker overrides the type
/// marker for that method only.
/// * `$target`: The service type
/// * `$method`: The method name
/// * `$marker`: A `Marker` expression (optional; defaults to `Marker::new()`)
#[macro_export]
macro_rules! profile_method {
    ($target:ident, $method:ident, $marker:expr) => {
        $crate::paste::paste! {
            $crate::ctor::declarative::ctor!{
                #[ctor]
                fn [<_attach_method_marker_ $target:snake _ $method:snake>]() {
                    $crate::selector::markers().attach_method(
                        ::std::any::type_name::<$target>(),
                        stringify!($method),
                        $marker,
                    );
                }
            }
        }
    };

    ($target:ident, $method:ident) => {
        $crate::profile_method!($target, $method, $crate::marker::Marker::new());
    };
}
pub use profile_method;

/// Implements [`Capture`](crate::capture::Capture) for types via their `Debug`
/// representation, honoring registered value formatters first.
#[macro_export]
macro_rules! impl_capture_debug {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::capture::Capture for $ty {
                fn capture(&self) -> $crate::capture::CapturedValue {
                    $crate::capture::capture_debug(self)
                }
            }
        )+
    };
}
pub use impl_capture_debug;

/// Generates a profiling decorator for a service type.
///
/// The decorator holds the wrapped service and an
/// [`Interceptor`](crate::interceptor::Interceptor), implements the given API
/// trait by forwarding each listed method through the interceptor, and wires
/// the service type into the registry via
/// [`Decorate`](crate::registry::Decorate). Methods returning `Result` whose
/// `Err` should be recorded as abnormal termination are listed with a
/// `#[fallible]` attribute.
///
/// ```rust,ignore
/// profile_service! {
///     pub struct UserServiceDecorator wraps UserService as UserApi {
///         fn find_user(&self, id: i64) -> User;
///         #[fallible]
///         fn delete_user(&self, id: i64) -> Result<(), ServiceError>;
///     }
/// }
/// ```
#[macro_export]
macro_rules! profile_service {
    (
        $(#[$meta:meta])*
        $vis:vis struct $decorator:ident wraps $target:ident as $api:path {
            $($methods:tt)*
        }
    ) => {
        $(#[$meta])*
        $vis struct $decorator {
            inner: $target,
            interceptor: $crate::interceptor::Interceptor,
        }

        impl $decorator {
            $vis fn new(
                inner: $target,
                interceptor: $crate::interceptor::Interceptor,
            ) -> Self {
                Self {
                    inner,
                    interceptor: interceptor
                        .with_decorator_type(::std::any::type_name::<$decorator>()),
                }
            }
        }

        impl $crate::registry::Decorate for $target {
            type Decorated = $decorator;

            fn decorate(
                self,
                interceptor: $crate::interceptor::Interceptor,
            ) -> ::std::result::Result<$decorator, (Self, $crate::error::ProfilingError)> {
                ::std::result::Result::Ok($decorator::new(self, interceptor))
            }
        }

        impl $api for $decorator {
            $crate::profile_service!(@methods $target; $($methods)*);
        }
    };

    (@methods $target:ident;) => {};

    (@methods $target:ident;
        #[fallible]
        fn $method:ident(&self $(, $arg:ident : $ty:ty)* $(,)?) -> $ret:ty;
        $($rest:tt)*
    ) => {
        fn $method(&self $(, $arg: $ty)*) -> $ret {
            let call = $crate::method::MethodCall::new(
                ::std::any::type_name::<$target>(),
                stringify!($method),
            )
            $(.with_argument(
                stringify!($arg),
                ::std::any::type_name::<$ty>(),
                $crate::capture::Capture::capture(&$arg),
            ))*;
            let inner = &self.inner;
            self.interceptor.invoke_fallible(
                call,
                |value| $crate::capture::Capture::capture(value),
                move || inner.$method($($arg),*),
            )
        }

        $crate::profile_service!(@methods $target; $($rest)*);
    };

    (@methods $target:ident;
        fn $method:ident(&self $(, $arg:ident : $ty:ty)* $(,)?) -> $ret:ty;
        $($rest:tt)*
    ) => {
        fn $method(&self $(, $arg: $ty)*) -> $ret {
            let call = $crate::method::MethodCall::new(
                ::std::any::type_name::<$target>(),
                stringify!($method),
            )
            $(.with_argument(
                stringify!($arg),
                ::std::any::type_name::<$ty>(),
                $crate::capture::Capture::capture(&$arg),
            ))*;
            let inner = &self.inner;
            self.interceptor.invoke(
                call,
                |value| $crate::capture::Capture::capture(value),
                move || inner.$method($($arg),*),
            )
        }

        $crate::profile_service!(@methods $target; $($rest)*);
    };

    (@methods $target:ident;
        fn $method:ident(&self $(, $arg:ident : $ty:ty)* $(,)?);
        $($rest:tt)*
    ) => {
        fn $method(&self $(, $arg: $ty)*) {
            let call = $crate::method::MethodCall::new(
                ::std::any::type_name::<$target>(),
                stringify!($method),
            )
            $(.with_argument(
                stringify!($arg),
                ::std::any::type_name::<$ty>(),
                $crate::capture::Capture::capture(&$arg),
            ))*;
            let inner = &self.inner;
            self.interceptor.invoke(
                call,
                |value| $crate::capture::Capture::capture(value),
                move || inner.$method($($arg),*),
            )
        }

        $crate::profile_service!(@methods $target; $($rest)*);
    };
}
pub use profile_service;
