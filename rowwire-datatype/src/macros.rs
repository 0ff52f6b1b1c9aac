macro_rules! impl_typed {
    ($ty:ty, $p:path) => {
        impl $crate::Typed for $ty {
            #[inline]
            fn ty() -> $crate::DataType {
                $p
            }
        }
    };
}
