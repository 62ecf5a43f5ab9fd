/// Host-independent key identifiers.
///
/// Front ends translate their native key codes into this set; keys with no
/// meaning to any machine map to `Key::None`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    Num1,
    Num2,
    Num3,
    Num4,
    Q,
    W,
    E,
    R,
    A,
    S,
    D,
    F,
    Z,
    X,
    C,
    V,
    J,
    K,
    L,
    P,
    T,
    Left,
    Right,
    Up,
    Down,
    Space,
    Return,
    Escape,
    None,
}
