/// One test per fixture: `name => (path, module, parameter count, port count)`.
#[macro_export]
macro_rules! module_shape_tests {
    ($($name:ident => ($path:expr, $module:expr, $params:expr, $ports:expr)),+ $(,)?) => {
        $(
            #[test]
            fn $name() {
                $crate::common::assert_module($path, $module, $params, $ports);
            }
        )+
    };
}
