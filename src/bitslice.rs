//! Bitsliced AES round primitives.
//!
//! Two 128-bit blocks travel through the cipher together as eight 32-bit
//! planes: plane `p` holds bit `p` of every byte of both blocks, and within a
//! plane the bit index is `r1 r0 c1 c0 b0` (row, column, block). Every round
//! operation is a sequence of whole-word bitwise instructions, so execution
//! time and memory-access pattern depend only on the number of blocks
//! processed, never on key or data bits. No lookup table exists anywhere in
//! this crate.
//!
//! The S-box is the 113-gate circuit by Boyar, Peralta and Calik
//! (<http://www.cs.yale.edu/homes/peralta/CircuitStuff/SLP_AES_113.txt>); the
//! inverse S-box reuses the same circuit wrapped in the inverse affine
//! transform, and the inverse MixColumns is computed algebraically from the
//! forward one, which is what lets encryption and decryption share a single
//! key schedule.

/// Bit-transposed pair of blocks, one plane per bit position.
pub(crate) type State = [u32; 8];

const M0: u32 = 0x5555_5555;
const M1: u32 = 0x3333_3333;
const M2: u32 = 0x0f0f_0f0f;

#[inline]
fn delta_swap_1(a: &mut u32, shift: u32, mask: u32) {
    let t = (*a ^ ((*a) >> shift)) & mask;
    *a ^= t ^ (t << shift);
}

#[inline]
fn delta_swap_2(a: &mut u32, b: &mut u32, shift: u32, mask: u32) {
    let t = (*a ^ ((*b) >> shift)) & mask;
    *a ^= t;
    *b ^= t << shift;
}

/// Orthogonalize: transpose two 128-bit blocks into eight bit planes.
///
/// Blocks load as little-endian 32-bit words. The swap network is an
/// involution; [`inv_bitslice`] runs the identical swaps and only differs in
/// byte marshalling.
pub(crate) fn bitslice(output: &mut State, input0: &[u8; 16], input1: &[u8; 16]) {
    // Interleave the two blocks column by column, then swap bit index pairs
    // 5<->0 (block vs p0), 6<->1 (c0 vs p1) and 7<->2 (c1 vs p2) so the top
    // three index bits select the plane.
    let mut t0 = u32::from_le_bytes(input0[0x00..0x04].try_into().unwrap());
    let mut t2 = u32::from_le_bytes(input0[0x04..0x08].try_into().unwrap());
    let mut t4 = u32::from_le_bytes(input0[0x08..0x0c].try_into().unwrap());
    let mut t6 = u32::from_le_bytes(input0[0x0c..0x10].try_into().unwrap());
    let mut t1 = u32::from_le_bytes(input1[0x00..0x04].try_into().unwrap());
    let mut t3 = u32::from_le_bytes(input1[0x04..0x08].try_into().unwrap());
    let mut t5 = u32::from_le_bytes(input1[0x08..0x0c].try_into().unwrap());
    let mut t7 = u32::from_le_bytes(input1[0x0c..0x10].try_into().unwrap());

    delta_swap_2(&mut t1, &mut t0, 1, M0);
    delta_swap_2(&mut t3, &mut t2, 1, M0);
    delta_swap_2(&mut t5, &mut t4, 1, M0);
    delta_swap_2(&mut t7, &mut t6, 1, M0);

    delta_swap_2(&mut t2, &mut t0, 2, M1);
    delta_swap_2(&mut t3, &mut t1, 2, M1);
    delta_swap_2(&mut t6, &mut t4, 2, M1);
    delta_swap_2(&mut t7, &mut t5, 2, M1);

    delta_swap_2(&mut t4, &mut t0, 4, M2);
    delta_swap_2(&mut t5, &mut t1, 4, M2);
    delta_swap_2(&mut t6, &mut t2, 4, M2);
    delta_swap_2(&mut t7, &mut t3, 4, M2);

    output[0] = t0;
    output[1] = t1;
    output[2] = t2;
    output[3] = t3;
    output[4] = t4;
    output[5] = t5;
    output[6] = t6;
    output[7] = t7;
}

/// Un-orthogonalize eight bit planes back into two 128-bit blocks.
pub(crate) fn inv_bitslice(input: &State) -> [[u8; 16]; 2] {
    let mut t0 = input[0];
    let mut t1 = input[1];
    let mut t2 = input[2];
    let mut t3 = input[3];
    let mut t4 = input[4];
    let mut t5 = input[5];
    let mut t6 = input[6];
    let mut t7 = input[7];

    delta_swap_2(&mut t1, &mut t0, 1, M0);
    delta_swap_2(&mut t3, &mut t2, 1, M0);
    delta_swap_2(&mut t5, &mut t4, 1, M0);
    delta_swap_2(&mut t7, &mut t6, 1, M0);

    delta_swap_2(&mut t2, &mut t0, 2, M1);
    delta_swap_2(&mut t3, &mut t1, 2, M1);
    delta_swap_2(&mut t6, &mut t4, 2, M1);
    delta_swap_2(&mut t7, &mut t5, 2, M1);

    delta_swap_2(&mut t4, &mut t0, 4, M2);
    delta_swap_2(&mut t5, &mut t1, 4, M2);
    delta_swap_2(&mut t6, &mut t2, 4, M2);
    delta_swap_2(&mut t7, &mut t3, 4, M2);

    let mut output = [[0u8; 16]; 2];
    output[0][0x00..0x04].copy_from_slice(&t0.to_le_bytes());
    output[0][0x04..0x08].copy_from_slice(&t2.to_le_bytes());
    output[0][0x08..0x0c].copy_from_slice(&t4.to_le_bytes());
    output[0][0x0c..0x10].copy_from_slice(&t6.to_le_bytes());
    output[1][0x00..0x04].copy_from_slice(&t1.to_le_bytes());
    output[1][0x04..0x08].copy_from_slice(&t3.to_le_bytes());
    output[1][0x08..0x0c].copy_from_slice(&t5.to_le_bytes());
    output[1][0x0c..0x10].copy_from_slice(&t7.to_le_bytes());
    output
}

/// Bitsliced AES S-box, Boyar-Peralta-Calik circuit.
///
/// The four bitwise NOTs of the affine output constant 0x63 are split out
/// into [`sub_bytes_nots`]; the two together form the complete S-box.
pub(crate) fn sub_bytes(state: &mut [u32]) {
    debug_assert_eq!(state.len(), 8);

    let u7 = state[0];
    let u6 = state[1];
    let u5 = state[2];
    let u4 = state[3];
    let u3 = state[4];
    let u2 = state[5];
    let u1 = state[6];
    let u0 = state[7];

    let y14 = u3 ^ u5;
    let y13 = u0 ^ u6;
    let y12 = y13 ^ y14;
    let t1 = u4 ^ y12;
    let y15 = t1 ^ u5;
    let t2 = y12 & y15;
    let y6 = y15 ^ u7;
    let y20 = t1 ^ u1;
    let y9 = u0 ^ u3;
    let y11 = y20 ^ y9;
    let t12 = y9 & y11;
    let y7 = u7 ^ y11;
    let y8 = u0 ^ u5;
    let t0 = u1 ^ u2;
    let y10 = y15 ^ t0;
    let y17 = y10 ^ y11;
    let t13 = y14 & y17;
    let t14 = t13 ^ t12;
    let y19 = y10 ^ y8;
    let t15 = y8 & y10;
    let t16 = t15 ^ t12;
    let y16 = t0 ^ y11;
    let y21 = y13 ^ y16;
    let t7 = y13 & y16;
    let y18 = u0 ^ y16;
    let y1 = t0 ^ u7;
    let y4 = y1 ^ u3;
    let t5 = y4 & u7;
    let t6 = t5 ^ t2;
    let t18 = t6 ^ t16;
    let t22 = t18 ^ y19;
    let y2 = y1 ^ u0;
    let t10 = y2 & y7;
    let t11 = t10 ^ t7;
    let t20 = t11 ^ t16;
    let t24 = t20 ^ y18;
    let y5 = y1 ^ u6;
    let t8 = y5 & y1;
    let t9 = t8 ^ t7;
    let t19 = t9 ^ t14;
    let t23 = t19 ^ y21;
    let y3 = y5 ^ y8;
    let t3 = y3 & y6;
    let t4 = t3 ^ t2;
    let t17 = t4 ^ y20;
    let t21 = t17 ^ t14;
    let t26 = t21 & t23;
    let t27 = t24 ^ t26;
    let t31 = t22 ^ t26;
    let t25 = t21 ^ t22;
    let t28 = t25 & t27;
    let t29 = t28 ^ t22;
    let z14 = t29 & y2;
    let z5 = t29 & y7;
    let t30 = t23 ^ t24;
    let t32 = t31 & t30;
    let t33 = t32 ^ t24;
    let t35 = t27 ^ t33;
    let t36 = t24 & t35;
    let t38 = t27 ^ t36;
    let t39 = t29 & t38;
    let t40 = t25 ^ t39;
    let t43 = t29 ^ t40;
    let z3 = t43 & y16;
    let tc12 = z3 ^ z5;
    let z12 = t43 & y13;
    let z13 = t40 & y5;
    let z4 = t40 & y1;
    let tc6 = z3 ^ z4;
    let t34 = t23 ^ t33;
    let t37 = t36 ^ t34;
    let t41 = t40 ^ t37;
    let z8 = t41 & y10;
    let z17 = t41 & y8;
    let t44 = t33 ^ t37;
    let z0 = t44 & y15;
    let z9 = t44 & y12;
    let z10 = t37 & y3;
    let z1 = t37 & y6;
    let tc5 = z1 ^ z0;
    let tc11 = tc6 ^ tc5;
    let z11 = t33 & y4;
    let t42 = t29 ^ t33;
    let t45 = t42 ^ t41;
    let z7 = t45 & y17;
    let tc8 = z7 ^ tc6;
    let z16 = t45 & y14;
    let z6 = t42 & y11;
    let tc16 = z6 ^ tc8;
    let z15 = t42 & y9;
    let tc20 = z15 ^ tc16;
    let tc1 = z15 ^ z16;
    let tc2 = z10 ^ tc1;
    let tc21 = tc2 ^ z11;
    let tc3 = z9 ^ tc2;
    let s0 = tc3 ^ tc16;
    let s3 = tc3 ^ tc11;
    let s1 = s3 ^ tc16;
    let tc13 = z13 ^ tc1;
    let z2 = t33 & u7;
    let tc4 = z0 ^ z2;
    let tc7 = z12 ^ tc4;
    let tc9 = z8 ^ tc7;
    let tc10 = tc8 ^ tc9;
    let tc17 = z14 ^ tc10;
    let s5 = tc21 ^ tc17;
    let tc26 = tc17 ^ tc20;
    let s2 = tc26 ^ z17;
    let tc14 = tc4 ^ tc12;
    let tc18 = tc13 ^ tc14;
    let s6 = tc10 ^ tc18;
    let s7 = z12 ^ tc18;
    let s4 = tc14 ^ s3;

    state[0] = s7;
    state[1] = s6;
    state[2] = s5;
    state[3] = s4;
    state[4] = s3;
    state[5] = s2;
    state[6] = s1;
    state[7] = s0;
}

/// The NOT operations omitted from the S-box circuit (output constant 0x63).
#[inline]
pub(crate) fn sub_bytes_nots(state: &mut [u32]) {
    debug_assert_eq!(state.len(), 8);
    state[0] ^= 0xffffffff;
    state[1] ^= 0xffffffff;
    state[5] ^= 0xffffffff;
    state[6] ^= 0xffffffff;
}

/// Bitsliced inverse S-box.
///
/// Uses the factorization invS = L . S . L with L(x) = A'(x ^ 0x63), where A'
/// is the inverse of the S-box affine layer. Both L applications are plain
/// plane XORs, so the whole inverse rides on the forward circuit and no
/// second circuit (or table) is needed.
pub(crate) fn inv_sub_bytes(state: &mut State) {
    inv_affine(state);
    sub_bytes(state);
    sub_bytes_nots(state);
    inv_affine(state);
}

/// Planewise x -> A'(x ^ 0x63): row i of A' taps bits i+2, i+5, i+7 (mod 8),
/// and the folded 0x63/0x05 constants leave a net complement on planes 0
/// and 2.
fn inv_affine(state: &mut State) {
    let a = *state;
    state[0] = !(a[2] ^ a[5] ^ a[7]);
    state[1] = a[3] ^ a[6] ^ a[0];
    state[2] = !(a[4] ^ a[7] ^ a[1]);
    state[3] = a[5] ^ a[0] ^ a[2];
    state[4] = a[6] ^ a[1] ^ a[3];
    state[5] = a[7] ^ a[2] ^ a[4];
    state[6] = a[0] ^ a[3] ^ a[5];
    state[7] = a[1] ^ a[4] ^ a[6];
}

/// ShiftRows over both interleaved blocks.
#[inline]
pub(crate) fn shift_rows(state: &mut State) {
    for x in state.iter_mut() {
        delta_swap_1(x, 4, 0x0c0f_0300);
        delta_swap_1(x, 2, 0x3300_3300);
    }
}

/// Inverse ShiftRows: the delta swaps are involutions, so running them in
/// reverse order undoes [`shift_rows`].
#[inline]
pub(crate) fn inv_shift_rows(state: &mut State) {
    for x in state.iter_mut() {
        delta_swap_1(x, 2, 0x3300_3300);
        delta_swap_1(x, 4, 0x0c0f_0300);
    }
}

/// MixColumns in plane form (Kasper-Schwabe formulation).
pub(crate) fn mix_columns(state: &mut State) {
    let (a0, a1, a2, a3, a4, a5, a6, a7) = (
        state[0], state[1], state[2], state[3], state[4], state[5], state[6], state[7],
    );
    let (b0, b1, b2, b3, b4, b5, b6, b7) = (
        rotate_rows_1(a0),
        rotate_rows_1(a1),
        rotate_rows_1(a2),
        rotate_rows_1(a3),
        rotate_rows_1(a4),
        rotate_rows_1(a5),
        rotate_rows_1(a6),
        rotate_rows_1(a7),
    );
    let (c0, c1, c2, c3, c4, c5, c6, c7) = (
        a0 ^ b0,
        a1 ^ b1,
        a2 ^ b2,
        a3 ^ b3,
        a4 ^ b4,
        a5 ^ b5,
        a6 ^ b6,
        a7 ^ b7,
    );
    state[0] = b0 ^ c7 ^ rotate_rows_2(c0);
    state[1] = b1 ^ c0 ^ c7 ^ rotate_rows_2(c1);
    state[2] = b2 ^ c1 ^ rotate_rows_2(c2);
    state[3] = b3 ^ c2 ^ c7 ^ rotate_rows_2(c3);
    state[4] = b4 ^ c3 ^ c7 ^ rotate_rows_2(c4);
    state[5] = b5 ^ c4 ^ rotate_rows_2(c5);
    state[6] = b6 ^ c5 ^ rotate_rows_2(c6);
    state[7] = b7 ^ c6 ^ rotate_rows_2(c7);
}

/// Inverse MixColumns, computed algebraically rather than from a decryption
/// key schedule.
///
/// The MixColumns matrix M satisfies M^4 = I, hence M^-1 = M . M^2, and M^2
/// multiplies each column by the polynomial 04*x^2 + 05. This function
/// applies that pre-multiply in plane form and then reuses [`mix_columns`].
pub(crate) fn inv_mix_columns(state: &mut State) {
    let a = *state;
    // planes of 4*a: xtime applied twice
    let c0 = a[6];
    let c1 = a[7] ^ a[6];
    let c2 = a[0] ^ a[7];
    let c3 = a[1] ^ a[6];
    let c4 = a[2] ^ a[7] ^ a[6];
    let c5 = a[3] ^ a[7];
    let c6 = a[4];
    let c7 = a[5];
    // b_r = 5*a_r ^ 4*a_{r+2}
    state[0] = c0 ^ a[0] ^ rotate_rows_2(c0);
    state[1] = c1 ^ a[1] ^ rotate_rows_2(c1);
    state[2] = c2 ^ a[2] ^ rotate_rows_2(c2);
    state[3] = c3 ^ a[3] ^ rotate_rows_2(c3);
    state[4] = c4 ^ a[4] ^ rotate_rows_2(c4);
    state[5] = c5 ^ a[5] ^ rotate_rows_2(c5);
    state[6] = c6 ^ a[6] ^ rotate_rows_2(c6);
    state[7] = c7 ^ a[7] ^ rotate_rows_2(c7);
    mix_columns(state);
}

/// XOR one expanded round key (8 planes) into the state.
#[inline]
pub(crate) fn add_round_key(state: &mut State, rkey: &[u32]) {
    debug_assert_eq!(rkey.len(), 8);
    for (a, b) in state.iter_mut().zip(rkey) {
        *a ^= b;
    }
}

#[inline(always)]
const fn ror(x: u32, y: u32) -> u32 {
    x.rotate_right(y)
}

#[inline(always)]
const fn ror_distance(rows: u32, cols: u32) -> u32 {
    (rows << 3) + (cols << 1)
}

/// Within a plane, fetch the value one row down (row r+1 into row r).
#[inline(always)]
const fn rotate_rows_1(x: u32) -> u32 {
    ror(x, ror_distance(1, 0))
}

/// Within a plane, fetch the value two rows down.
#[inline(always)]
const fn rotate_rows_2(x: u32) -> u32 {
    ror(x, ror_distance(2, 0))
}
